#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use kampus::kampus_auth::create_access_token;
use kampus::kampus_config::{CorsConfig, EmailConfig, HttpConfig, JwtConfig};
use kampus::kampus_core::hash_password;
use kampus::kampus_db::{Directory, InMemoryDirectory, NewUser};
use kampus::kampus_models::{EnrollmentStatus, User, UserType};
use kampus::router::init_router;
use kampus::state::AppState;
use kampus::utils::email::{BuiltinTemplates, EmailError, EmailService, MailTransport, OutgoingEmail};
use kampus::utils::notices::NoticeBoard;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

/// Mail transport that keeps delivered messages, or fails on demand.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    fail: AtomicBool,
}

impl RecordingTransport {
    pub fn fail_deliveries(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::Transport("connection refused".to_string()));
        }
        self.sent.lock().await.push(email);
        Ok(())
    }
}

pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub state: AppState,
    pub directory: Arc<InMemoryDirectory>,
    pub mail: Arc<RecordingTransport>,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

fn email_config() -> EmailConfig {
    EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@kampus.edu".to_string(),
        from_name: "Kampus".to_string(),
        timeout: Duration::from_secs(1),
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_directory(|directory| directory as Arc<dyn Directory>)
    }

    /// Serve requests through `wrap(directory)` while `directory` stays
    /// reachable for setup.
    pub fn with_directory(
        wrap: impl FnOnce(Arc<InMemoryDirectory>) -> Arc<dyn Directory>,
    ) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let mail = Arc::new(RecordingTransport::default());
        let email = EmailService::new(
            Arc::new(BuiltinTemplates::new()),
            mail.clone(),
            Duration::from_secs(1),
        );

        let state = AppState {
            directory: wrap(directory.clone()),
            jwt_config: jwt_config(),
            email_config: email_config(),
            cors_config: CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
            http_config: HttpConfig::default(),
            email: Arc::new(email),
            notices: NoticeBoard::new(),
        };

        Self {
            state,
            directory,
            mail,
        }
    }

    pub async fn create_user(&self, user_type: Option<UserType>, is_staff: bool) -> TestUser {
        self.create_user_with_password(user_type, is_staff, "unused-hash", false)
            .await
    }

    /// `password` is hashed when `hash` is set, stored verbatim otherwise.
    pub async fn create_user_with_password(
        &self,
        user_type: Option<UserType>,
        is_staff: bool,
        password: &str,
        hash: bool,
    ) -> TestUser {
        let password_hash = if hash {
            hash_password(password).unwrap()
        } else {
            password.to_string()
        };
        let user = self
            .directory
            .create_user(NewUser {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: generate_unique_email(),
                password_hash,
                is_staff,
            })
            .await
            .unwrap();
        if user_type.is_some() {
            self.directory.set_user_type(user.id, user_type).await.unwrap();
        }
        let token = create_access_token(user.id, &user.email, user.is_staff, &jwt_config()).unwrap();
        TestUser { user, token }
    }

    /// A course taught by `teacher` with `student` enrolled; returns the enrollment id.
    pub async fn enroll(
        &self,
        teacher: Option<Uuid>,
        student: Uuid,
        code: &str,
        credits: i32,
        grade: Option<&str>,
        status: EnrollmentStatus,
    ) -> Uuid {
        let course = self.directory.add_course(code, "Test Course", credits).await;
        let group = self.directory.add_group(course.id, teacher, "fall", 2025).await;
        self.directory.enroll(student, group.id, grade, status).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = init_router(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@kampus.edu", Uuid::new_v4())
}
