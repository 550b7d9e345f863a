mod user;
pub use user::{UserEntity, UserEntityCreate};

mod course;
pub use course::{Course, CourseCreate};

mod lecture;
pub use lecture::{Lecture, LectureBody, LectureCreate, LectureKind, QUIZ_OPTION_COUNT, QuizQuestion};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCreate};

mod progress;
pub use progress::{StudentProgress, StudentProgressCreate};
