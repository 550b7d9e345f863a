mod common;
use axum::http::StatusCode;
use lectern::model::entity::StudentProgress;
use serde_json::{Value, json};

use crate::common::{
    Action, Flow, add_quiz_action, add_reading_action, complete_action, course_progress_action,
    create_course_action, enroll_action, setup_server, setup_server_with_state, signin_action,
    signup_action, submit_action,
};

fn accessible(body: &str) -> Vec<bool> {
    let progress: Value = serde_json::from_str(body).unwrap();
    progress["lectures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["accessible"].as_bool().unwrap())
        .collect()
}

/// Instructor with one course, saved as `course`.
fn with_course(flow: Flow) -> Flow {
    flow.step(signup_action("ins@example.com", "Ines", "instructor"))
        .step(create_course_action("Sequenced").with_save_as("course"))
}

#[tokio::test]
async fn route_reading_unlock_test() {
    let mut server = setup_server();

    with_course(Flow::new())
        .step(add_reading_action("course", "One").with_save_as("r1"))
        .step(add_reading_action("course", "Two").with_save_as("r2"))
        .step(add_reading_action("course", "Three").with_save_as("r3"))
        .step(signup_action("stu@example.com", "Stu", "student"))
        // not enrolled yet
        .step(complete_action("r1").with_expect(StatusCode::FORBIDDEN))
        .step(course_progress_action("course").with_expect(StatusCode::FORBIDDEN))
        .step(enroll_action("course"))
        .step(course_progress_action("course").assert_body(|body| {
            assert_eq!(accessible(body), vec![true, false, false]);
            let progress: Value = serde_json::from_str(body).unwrap();
            assert_eq!(progress["percentage"], 0.0);
        }))
        .step(
            Action::new("open_locked", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lectures/{}", ctx.id_of("r2")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(complete_action("r1").assert_body(|body| {
            let record: StudentProgress = serde_json::from_str(body).unwrap();
            assert!(record.completed());
            assert_eq!(record.score(), None);
        }))
        .step(
            course_progress_action("course")
                .with_save_as("after_first")
                .assert_body(|body| assert_eq!(accessible(body), vec![true, true, false])),
        )
        .step(
            Action::new("open_second", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lectures/{}", ctx.id_of("r2")))
                .assert_body(|body| {
                    let view: Value = serde_json::from_str(body).unwrap();
                    assert_eq!(view["content"], "Two text");
                    assert_eq!(view["completed"], false);
                }),
        )
        .step(complete_action("r3").with_expect(StatusCode::FORBIDDEN))
        .step(complete_action("r2"))
        .step(complete_action("r3"))
        .step(course_progress_action("course").assert_body(|body| {
            let progress: Value = serde_json::from_str(body).unwrap();
            assert_eq!(progress["completed"], 3);
            assert_eq!(progress["percentage"], 100.0);
            assert_eq!(progress["nextLectureId"], Value::Null);
        }))
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn route_quiz_flow_test() {
    let (state, mut server) = setup_server_with_state();

    with_course(Flow::new())
        .step(add_reading_action("course", "Intro").with_save_as("intro"))
        .step(add_quiz_action("course", "Check", 3).with_save_as("quiz"))
        .step(add_reading_action("course", "Outro").with_save_as("outro"))
        .step(signup_action("stu@example.com", "Stu", "student"))
        .step(enroll_action("course"))
        // quiz still locked
        .step(submit_action("quiz", 3).with_expect(StatusCode::FORBIDDEN))
        .step(complete_action("intro"))
        .step(
            Action::new("open_quiz", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lectures/{}", ctx.id_of("quiz")))
                .assert_body(|body| {
                    assert!(!body.contains("correctAnswer"));
                    let view: Value = serde_json::from_str(body).unwrap();
                    assert_eq!(view["questions"].as_array().unwrap().len(), 3);
                }),
        )
        .step(complete_action("quiz").with_expect(StatusCode::BAD_REQUEST))
        .step(
            Action::new("submit_partial", "POST", "")
                .with_dyn_path(|ctx| format!("/api/v1/lectures/{}/submit", ctx.id_of("quiz")))
                .with_dyn_body(|ctx| {
                    json!({ "answers": [{ "questionId": ctx.get("quiz")["questions"][0]["id"], "option": 0 }] })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("2 question(s)"))),
        )
        .step(submit_action("quiz", 2).assert_body(|body| {
            let submission: Value = serde_json::from_str(body).unwrap();
            assert_eq!(submission["outcome"]["score"], 67);
            assert_eq!(submission["outcome"]["passed"], false);
            assert_eq!(submission["progress"], Value::Null);
        }))
        .step(course_progress_action("course").assert_body(|body| {
            assert_eq!(accessible(body), vec![true, true, false]);
        }))
        .step(complete_action("outro").with_expect(StatusCode::FORBIDDEN))
        .step(submit_action("quiz", 3).assert_body(|body| {
            let submission: Value = serde_json::from_str(body).unwrap();
            assert_eq!(submission["outcome"]["score"], 100);
            assert_eq!(submission["outcome"]["passed"], true);
            assert_eq!(submission["progress"]["score"], 100);
        }))
        // a later failing attempt leaves the pass in place
        .step(submit_action("quiz", 0))
        .step(course_progress_action("course").assert_body(|body| {
            assert_eq!(accessible(body), vec![true, true, true]);
            let progress: Value = serde_json::from_str(body).unwrap();
            assert_eq!(progress["lectures"][1]["score"], 100);
        }))
        .step(complete_action("outro"))
        .run(&mut server)
        .await;

    let records = state.mm().load::<StudentProgress>().await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.completed()));
}

#[tokio::test]
async fn route_quiz_resubmit_overwrites_test() {
    let (state, mut server) = setup_server_with_state();

    with_course(Flow::new())
        .step(add_quiz_action("course", "Only quiz", 4).with_save_as("quiz"))
        .step(signup_action("stu@example.com", "Stu", "student"))
        .step(enroll_action("course"))
        .step(submit_action("quiz", 3).assert_body(|body| {
            let submission: Value = serde_json::from_str(body).unwrap();
            assert_eq!(submission["outcome"]["score"], 75);
        }))
        .step(submit_action("quiz", 4))
        .run(&mut server)
        .await;

    let records = state.mm().load::<StudentProgress>().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].score(), Some(100));
}

#[tokio::test]
async fn route_overview_test() {
    let mut server = setup_server();

    with_course(Flow::new())
        .step(add_reading_action("course", "One").with_save_as("r1"))
        .step(add_reading_action("course", "Two"))
        .step(create_course_action("Second").with_save_as("second"))
        .step(add_reading_action("second", "Only"))
        .step(signup_action("stu@example.com", "Stu", "student"))
        .step(
            Action::new("empty_overview", "GET", "/api/v1/progress").assert_body(|body| {
                let overview: Value = serde_json::from_str(body).unwrap();
                assert_eq!(overview["role"], "student");
                assert_eq!(overview["courses"].as_array().unwrap().len(), 0);
                assert_eq!(overview["overallPercentage"], 0);
            }),
        )
        .step(enroll_action("course"))
        .step(enroll_action("second"))
        .step(complete_action("r1"))
        .step(
            Action::new("student_overview", "GET", "/api/v1/progress").assert_body(|body| {
                let overview: Value = serde_json::from_str(body).unwrap();
                assert_eq!(overview["courses"].as_array().unwrap().len(), 2);
                assert_eq!(overview["completedLectures"], 1);
                assert_eq!(overview["totalLectures"], 3);
                assert_eq!(overview["overallPercentage"], 33);
                assert_eq!(overview["completedCourses"], 0);
            }),
        )
        .step(signin_action("ins@example.com"))
        .step(
            Action::new("instructor_overview", "GET", "/api/v1/progress").assert_body(|body| {
                let overview: Value = serde_json::from_str(body).unwrap();
                assert_eq!(overview["role"], "instructor");
                assert_eq!(overview["courseCount"], 2);
                assert_eq!(overview["lectureCount"], 3);
                assert_eq!(overview["enrollmentCount"], 2);
            }),
        )
        .step(Action::new("signout", "POST", "/api/v1/account/signout"))
        .step(Action::new("anonymous", "GET", "/api/v1/progress").with_expect(StatusCode::UNAUTHORIZED))
        .run(&mut server)
        .await;
}
