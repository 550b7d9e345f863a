#![allow(dead_code)] // each test binary uses a different subset

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use lectern::{build_server_with_store, model::MemoryStore, web::AppState};
use serde_json::{Value, json};
use tower_cookies::Cookie;

/// Fresh app over an empty in-memory store.
pub fn setup_server() -> TestServer {
    setup_server_with_state().1
}

/// Same as [`setup_server`], also handing back the state so tests can look at the store.
pub fn setup_server_with_state() -> (AppState, TestServer) {
    let (state, app) = build_server_with_store(Arc::new(MemoryStore::new()), false);
    (state, TestServer::new(app).unwrap())
}

#[derive(Debug)]
pub struct FlowContext {
    pub store: HashMap<&'static str, Value>, // a way to pass data between steps
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn store(&mut self, key: &'static str, val: Value) {
        self.store.insert(key, val);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.store.get(key).expect("missing store key")
    }

    /// `id` field of a saved response body.
    pub fn id_of(&self, key: &str) -> String {
        self.get(key)["id"]
            .as_str()
            .expect("saved body has no id")
            .to_string()
    }
}

pub struct Action {
    pub name: &'static str,
    pub method: &'static str,
    pub path: String,
    pub dyn_path: Option<Box<dyn Fn(&FlowContext) -> String + Send + Sync>>,
    pub body: Option<Value>,
    pub dyn_body: Option<Box<dyn Fn(&FlowContext) -> Value + Send + Sync>>,
    pub expect: StatusCode,
    pub clear_cookies: bool,
    pub save_cookies: bool,
    pub query_params: Vec<(String, String)>,
    pub cookie_asserts: Vec<(&'static str, Box<dyn Fn(&Cookie) + Send + Sync>)>,
    pub body_asserts: Vec<Box<dyn Fn(&str) + Send + Sync>>,
    pub save_as: Option<&'static str>,
}

impl Action {
    pub fn new(name: &'static str, method: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method,
            path: path.to_string(),
            dyn_path: None,
            body: None,
            dyn_body: None,
            expect: StatusCode::OK,
            clear_cookies: false,
            save_cookies: true,
            query_params: vec![],
            cookie_asserts: vec![],
            body_asserts: vec![],
            save_as: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_expect(mut self, expect: StatusCode) -> Self {
        self.expect = expect;
        self
    }

    pub fn with_save_cookies(mut self, save_cookies: bool) -> Self {
        self.save_cookies = save_cookies;
        self
    }

    pub fn with_clear_cookies(mut self, clear_cookies: bool) -> Self {
        self.clear_cookies = clear_cookies;
        self
    }

    pub fn with_param(mut self, key: &str, val: &str) -> Self {
        self.query_params
            .push((String::from(key), String::from(val)));
        self
    }

    pub fn with_dyn_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> String + Send + Sync + 'static,
    {
        self.dyn_path = Some(Box::new(f));
        self
    }

    pub fn with_dyn_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> Value + Send + Sync + 'static,
    {
        self.dyn_body = Some(Box::new(f));
        self
    }

    pub fn with_save_as(mut self, key: &'static str) -> Self {
        self.save_as = Some(key);
        self
    }

    pub fn assert_cookie<F>(mut self, name: &'static str, check: F) -> Self
    where
        F: Fn(&Cookie) + Send + Sync + 'static,
    {
        self.cookie_asserts.push((name, Box::new(check)));
        self
    }

    pub fn assert_body<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.body_asserts.push(Box::new(check));
        self
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn run(self, server: &mut TestServer) {
        let mut ctx = FlowContext::new(); // create new context for this flow
        for action in self.actions {
            println!("==> Running test action `{}`", action.name);
            if action.clear_cookies {
                server.clear_cookies();
            }

            if action.save_cookies {
                server.save_cookies();
            } else {
                server.do_not_save_cookies();
            }

            let path = if let Some(dyn_path_fn) = action.dyn_path {
                dyn_path_fn(&ctx)
            } else {
                action.path.clone()
            };

            let mut req = match action.method {
                "GET" => server.get(&path),
                "POST" => server.post(&path),
                _ => panic!("unsupported method {}", action.method),
            };

            match (action.dyn_body, action.body) {
                (Some(f), _) => {
                    req = req.json(&f(&ctx));
                }
                (_, Some(json)) => req = req.json(&json),
                _ => {}
            }

            if !action.query_params.is_empty() {
                for (k, v) in action.query_params {
                    req = req.add_query_param(&k, v);
                }
            }

            let resp = req.await;
            if resp.status_code() != action.expect {
                panic!(
                    "step `{}` {} {}: expected {}, got {}\n{}",
                    action.name,
                    action.method,
                    path,
                    action.expect,
                    resp.status_code(),
                    resp.text()
                );
            }
            let cookies = resp.cookies();

            if !action.cookie_asserts.is_empty() {
                for (cookie_name, check) in action.cookie_asserts {
                    let cookie = cookies
                        .get(cookie_name)
                        .unwrap_or_else(|| panic!("Cookie {} is not set", cookie_name));
                    check(cookie);
                }
            }

            if !action.body_asserts.is_empty() {
                let body = resp.json::<Value>();
                let body = serde_json::to_string(&body)
                    .unwrap_or_else(|_| panic!("Unable to serialize body to string"));
                for check in action.body_asserts {
                    check(&body);
                }
            }

            if let Some(save_key) = action.save_as {
                let body = resp.json::<Value>();
                ctx.store(save_key, body);
            }
        }
    }
}

// Common actions builders

pub fn signup_action(email: &str, name: &str, role: &str) -> Action {
    Action::new("signup", "POST", "/api/v1/account/signup").with_body(json!({
        "email": email,
        "name": name,
        "role": role,
    }))
}

pub fn signin_action(email: &str) -> Action {
    Action::new("signin", "POST", "/api/v1/account/signin").with_body(json!({
        "email": email,
    }))
}

pub fn create_course_action(title: &str) -> Action {
    Action::new("create_course", "POST", "/api/v1/courses").with_body(json!({
        "title": title,
        "description": format!("All about {title}"),
    }))
}

pub fn add_reading_action(course_key: &'static str, title: &'static str) -> Action {
    Action::new("add_reading", "POST", "")
        .with_dyn_path(move |ctx| format!("/api/v1/courses/{}/lectures", ctx.id_of(course_key)))
        .with_body(json!({
            "title": title,
            "type": "reading",
            "content": format!("{title} text"),
        }))
}

/// Quiz where the first option is always correct.
pub fn add_quiz_action(course_key: &'static str, title: &'static str, questions: usize) -> Action {
    let questions: Vec<Value> = (0..questions)
        .map(|i| {
            json!({
                "question": format!("Question {i}"),
                "options": ["right", "wrong", "also wrong", "nope"],
                "correctAnswer": 0,
            })
        })
        .collect();

    Action::new("add_quiz", "POST", "")
        .with_dyn_path(move |ctx| format!("/api/v1/courses/{}/lectures", ctx.id_of(course_key)))
        .with_body(json!({
            "title": title,
            "type": "quiz",
            "questions": questions,
        }))
}

pub fn enroll_action(course_key: &'static str) -> Action {
    Action::new("enroll", "POST", "")
        .with_dyn_path(move |ctx| format!("/api/v1/courses/{}/enroll", ctx.id_of(course_key)))
}

pub fn complete_action(lecture_key: &'static str) -> Action {
    Action::new("complete", "POST", "")
        .with_dyn_path(move |ctx| format!("/api/v1/lectures/{}/complete", ctx.id_of(lecture_key)))
}

/// Answers the first `correct` questions of a saved quiz right and the rest wrong.
pub fn submit_action(quiz_key: &'static str, correct: usize) -> Action {
    Action::new("submit", "POST", "")
        .with_dyn_path(move |ctx| format!("/api/v1/lectures/{}/submit", ctx.id_of(quiz_key)))
        .with_dyn_body(move |ctx| {
            let answers: Vec<Value> = ctx.get(quiz_key)["questions"]
                .as_array()
                .expect("saved quiz has no questions")
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    json!({
                        "questionId": q["id"],
                        "option": if i < correct { 0 } else { 1 },
                    })
                })
                .collect();
            json!({ "answers": answers })
        })
}

pub fn course_progress_action(course_key: &'static str) -> Action {
    Action::new("course_progress", "GET", "")
        .with_dyn_path(move |ctx| format!("/api/v1/courses/{}/progress", ctx.id_of(course_key)))
}
