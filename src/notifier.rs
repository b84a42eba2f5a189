use std::sync::Arc;

use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::entities::Reservation;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl Notification {
    pub fn reservation_confirmation(reservation: &Reservation) -> Self {
        let html_body = format!(
            r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <h1>Welcome to Echohorn!</h1>
  <h2>Thank you, {name}!</h2>
  <p>We've received your trial booking request.</p>
  <h3>Your booking details</h3>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Company:</strong> {company}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Phone:</strong> {phone}</p>
  <p><strong>Booking ID:</strong> {id}</p>
</body>
</html>"#,
            name = escape_html(&reservation.name),
            company = escape_html(&reservation.company),
            email = escape_html(&reservation.email),
            phone = escape_html(&reservation.phone),
            id = reservation.id,
        );

        Self {
            to: reservation.email.clone(),
            subject: "Your Echohorn Trial Booking is Confirmed!".into(),
            html_body,
        }
    }

    pub fn reservation_alert(reservation: &Reservation, admin_email: &str) -> Self {
        let html_body = format!(
            r#"<html>
<body style="font-family: Arial, sans-serif;">
  <h2>New trial booking</h2>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Company:</strong> {company}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Phone:</strong> {phone}</p>
  <p><strong>Fleet size:</strong> {fleet_size}</p>
  <p><strong>Message:</strong> {message}</p>
  <p><strong>Booking ID:</strong> {id}</p>
</body>
</html>"#,
            name = escape_html(&reservation.name),
            company = escape_html(&reservation.company),
            email = escape_html(&reservation.email),
            phone = escape_html(&reservation.phone),
            fleet_size = escape_html(reservation.fleet_size.as_deref().unwrap_or("-")),
            message = escape_html(reservation.message.as_deref().unwrap_or("-")),
            id = reservation.id,
        );

        Self {
            to: admin_email.into(),
            subject: format!("New trial booking: {}", reservation.company),
            html_body,
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Final destination of outbound notifications.
#[async_trait]
pub trait MailSink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), Error>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, Error> {
        let credentials = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: config.user.parse::<Mailbox>()?,
        })
    }
}

#[async_trait]
impl MailSink for SmtpMailer {
    #[tracing::instrument(skip(self, notification), fields(to = %notification.to))]
    async fn deliver(&self, notification: &Notification) -> Result<(), Error> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(notification.to.parse::<Mailbox>()?)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(notification.html_body.clone())?;

        self.transport.send(message).await?;

        Ok(())
    }
}

/// Used when SMTP credentials are absent; drops every notification.
pub struct DisabledMailer;

#[async_trait]
impl MailSink for DisabledMailer {
    async fn deliver(&self, notification: &Notification) -> Result<(), Error> {
        tracing::warn!(
            to = %notification.to,
            "SMTP not configured, skipping email notification"
        );

        Ok(())
    }
}

/// Submit-and-forget queue in front of a `MailSink`. Delivery happens on a
/// background task; failures are logged and never retried.
#[derive(Clone)]
pub struct Notifier {
    sender: Sender<Notification>,
    admin_email: String,
}

impl Notifier {
    /// Starts the delivery task on the current tokio runtime.
    pub fn spawn(sink: Arc<dyn MailSink>, admin_email: impl Into<String>) -> Self {
        let (sender, receiver) = async_channel::unbounded();

        tokio::spawn(deliver_all(receiver, sink));

        Self {
            sender,
            admin_email: admin_email.into(),
        }
    }

    pub fn submit(&self, notification: Notification) {
        if let Err(err) = self.sender.try_send(notification) {
            tracing::warn!(to = %err.into_inner().to, "notification queue closed, dropping");
        }
    }

    pub fn reservation_created(&self, reservation: &Reservation) {
        self.submit(Notification::reservation_confirmation(reservation));
        self.submit(Notification::reservation_alert(reservation, &self.admin_email));
    }
}

async fn deliver_all(receiver: Receiver<Notification>, sink: Arc<dyn MailSink>) {
    while let Ok(notification) = receiver.recv().await {
        match sink.deliver(&notification).await {
            Ok(()) => tracing::info!(to = %notification.to, "notification delivered"),
            Err(err) => tracing::warn!(
                to = %notification.to,
                error = %err,
                "notification delivery failed"
            ),
        }
    }

    tracing::info!("notification queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::reservation::sample_new_reservation;
    use crate::error::mail_error;
    use std::time::Duration;

    struct ChannelSink {
        delivered: Sender<Notification>,
        fail: bool,
    }

    #[async_trait]
    impl MailSink for ChannelSink {
        async fn deliver(&self, notification: &Notification) -> Result<(), Error> {
            self.delivered.send(notification.clone()).await.ok();

            if self.fail {
                return Err(mail_error("relay refused"));
            }

            Ok(())
        }
    }

    #[tokio::test]
    async fn reservation_created_queues_two_mails_test() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = Notifier::spawn(
            Arc::new(ChannelSink {
                delivered: tx,
                fail: false,
            }),
            "ops@echohorn.test",
        );

        let mut input = sample_new_reservation("9876543210");
        input.company = "<Acme & Sons>".into();
        let reservation = Reservation::new(input).unwrap();

        notifier.reservation_created(&reservation);

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.to, reservation.email);
        assert!(first.html_body.contains(&reservation.id.to_string()));
        assert!(first.html_body.contains("&lt;Acme &amp; Sons&gt;"));
        assert_eq!(second.to, "ops@echohorn.test");
    }

    #[tokio::test]
    async fn failed_delivery_does_not_stop_worker_test() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = Notifier::spawn(
            Arc::new(ChannelSink {
                delivered: tx,
                fail: true,
            }),
            "ops@echohorn.test",
        );

        for to in ["a@x.test", "b@x.test"] {
            notifier.submit(Notification {
                to: to.into(),
                subject: "s".into(),
                html_body: "b".into(),
            });
        }

        for expected in ["a@x.test", "b@x.test"] {
            let n = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(n.to, expected);
        }
    }
}
