use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use coursehub_config::EmailConfig;
use coursehub_core::AppError;
use coursehub_models::{Course, User};

#[derive(Clone, Debug)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Sends the subscription confirmation from a detached task.
    ///
    /// Returns immediately. A delivery failure is logged and never reaches
    /// the caller, whose enrollment is already committed. The handle is
    /// `None` when email is disabled.
    pub fn notify_subscription(&self, user: &User, course: &Course) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            debug!(user.id = %user.id, course.id = %course.id, "Email disabled, skipping subscription notice");
            return None;
        }

        let service = self.clone();
        let to_email = user.email.clone();
        let to_name = user.first_name.clone();
        let course = course.clone();

        Some(tokio::spawn(async move {
            if let Err(e) = service
                .send_subscription_confirmation(&to_email, &to_name, &course)
                .await
            {
                error!(
                    error = %e.error,
                    user.email = %to_email,
                    course.id = %course.id,
                    "Email could not be sent"
                );
            }
        }))
    }

    #[instrument(skip(self, course), fields(course.id = %course.id))]
    pub async fn send_subscription_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
        course: &Course,
    ) -> Result<(), AppError> {
        let html_body = self.subscription_template(to_name, course);
        let text_body = format!(
            "Hi {},\n\n\
             Your subscription to {} was successful.\n\
             Course duration: {}\n\n\
             Best regards,\n\
             Coursehub Team",
            to_name, course.course_name, course.duration
        );

        self.send_email(
            to_email,
            "Subscription confirmed!",
            &text_body,
            &html_body,
        )
        .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn subscription_template(&self, name: &str, course: &Course) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Subscription confirmed</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
                    <tr>
                        <td style="background-color: #2563EB; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">Coursehub</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px;">
                                Hi <strong>{}</strong>,
                            </p>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px;">
                                Your subscription to <strong>{}</strong> was successful.
                            </p>
                            <p style="margin: 0; color: #666666; font-size: 14px;">
                                Duration: {}
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            name, course.course_name, course.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        let now = chrono::Utc::now();
        Course {
            id: uuid::Uuid::new_v4(),
            course_name: "Intro to Rust".to_string(),
            duration: "40h".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_subscription_template_mentions_course() {
        let service = EmailService::new(EmailConfig::disabled());
        let html = service.subscription_template("Ada", &course());

        assert!(html.contains("Ada"));
        assert!(html.contains("Intro to Rust"));
        assert!(html.contains("40h"));
    }

    fn user() -> User {
        let now = chrono::Utc::now();
        User {
            id: uuid::Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            is_adm: false,
            created_at: now,
            updated_at: now,
            courses: vec![],
        }
    }

    fn unreachable_smtp() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 1,
            ..EmailConfig::disabled()
        }
    }

    #[tokio::test]
    async fn test_notify_is_noop_when_disabled() {
        let service = EmailService::new(EmailConfig::disabled());
        assert!(service.notify_subscription(&user(), &course()).is_none());
    }

    #[tokio::test]
    async fn test_send_fails_without_smtp_server() {
        let service = EmailService::new(unreachable_smtp());
        let result = service
            .send_subscription_confirmation("ada@example.com", "Ada", &course())
            .await;

        let err = result.unwrap_err();
        assert!(err.status.is_server_error());
    }

    #[tokio::test]
    async fn test_notify_swallows_delivery_failure() {
        let service = EmailService::new(unreachable_smtp());
        let handle = service
            .notify_subscription(&user(), &course())
            .expect("enabled service spawns a task");

        // The task logs the failure and finishes without panicking.
        handle.await.unwrap();
    }
}
