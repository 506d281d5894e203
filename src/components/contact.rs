//! Contact form submission with transient notices
//!
//! Delivery goes through a [`FormSubmitter`]. The default one only
//! simulates a round trip: it waits, then fails with the configured
//! probability. Either way the visitor gets a notice and the submit button
//! leaves its loading state.

use crate::component::{Component, ComponentBase};
use crate::config::{Config, ContactConfig};
use crate::dom::{NodeId, Page};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const STYLE_ID: &str = "notification-styles";

const NOTIFICATION_CSS: &str = "
.notification {
    position: fixed; top: 20px; right: 20px; padding: 1rem 1.5rem;
    border-radius: 0.5rem; color: white; z-index: 10000;
    animation: slideInRight 0.3s ease-out;
}
.notification-success { background: #10b981; }
.notification-error { background: #ef4444; }
.notification-content { display: flex; align-items: center; gap: 0.5rem; }
@keyframes slideInRight {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("simulated delivery failure")]
    Simulated,

    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Delivers the form's named fields somewhere
pub trait FormSubmitter {
    fn submit(&self, fields: Vec<(String, String)>) -> LocalBoxFuture<'static, Result<(), SubmitError>>;
}

/// Waits `delay`, then fails with probability `failure_rate`
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        Self {
            delay,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &ContactConfig) -> Self {
        Self::new(config.submit_delay(), config.failure_rate)
    }
}

impl FormSubmitter for SimulatedSubmitter {
    fn submit(&self, fields: Vec<(String, String)>) -> LocalBoxFuture<'static, Result<(), SubmitError>> {
        let delay = self.delay;
        let fails = rand::random::<f64>() < self.failure_rate;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(fields = fields.len(), fails, "simulated form delivery");
            if fails {
                Err(SubmitError::Simulated)
            } else {
                Ok(())
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Success => "fa-check-circle",
            NoticeKind::Error => "fa-exclamation-circle",
        }
    }
}

fn ensure_notification_styles(page: &Page) {
    if page.get_element_by_id(STYLE_ID).is_some() {
        return;
    }
    page.build("style")
        .id(STYLE_ID)
        .text(NOTIFICATION_CSS)
        .append_to(page.head());
}

/// Append a notice to the body; it animates out and is removed later
pub fn show_notification(page: &Page, config: &Config, message: &str, kind: NoticeKind) -> NodeId {
    ensure_notification_styles(page);

    let notice = page
        .build("div")
        .class("notification")
        .class(&format!("notification-{}", kind.as_str()))
        .child("div", |content| {
            content
                .class("notification-content")
                .child("i", |i| i.class("fas").class(kind.icon()))
                .child("span", |s| s.text(message))
        })
        .append_to(page.body());

    let display = Duration::from_millis(config.ui.notifications.display_ms);
    let exit = Duration::from_millis(config.ui.notifications.exit_ms);
    let page_handle = page.clone();
    page.spawn(async move {
        tokio::time::sleep(display).await;
        page_handle.set_style(notice, "animation", "slideInRight 0.3s ease-out reverse");
        tokio::time::sleep(exit).await;
        page_handle.remove(notice);
        Ok(())
    });

    notice
}

pub struct ContactComponent {
    base: ComponentBase,
    form: Option<NodeId>,
    submitter: Rc<dyn FormSubmitter>,
}

impl ContactComponent {
    pub fn new(config: Arc<Config>, page: Page) -> Self {
        let submitter = Rc::new(SimulatedSubmitter::from_config(&config.contact));
        Self {
            base: ComponentBase::new(config, page),
            form: None,
            submitter,
        }
    }

    pub fn with_submitter(mut self, submitter: Rc<dyn FormSubmitter>) -> Self {
        self.submitter = submitter;
        self
    }
}

impl Component for ContactComponent {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn setup_dom(&mut self) -> anyhow::Result<()> {
        self.form = self.base.query(&self.base.config().selectors.contact_form);
        Ok(())
    }

    fn bind_events(&mut self) -> anyhow::Result<()> {
        let Some(form) = self.form else {
            return Ok(());
        };
        let page = self.base.page().clone();
        let config = self.base.config().clone();
        let submitter = self.submitter.clone();

        self.base.listen(Some(form), "submit", move |e| {
            e.prevent_default();

            let button = page.query_within(form, "button[type=\"submit\"]");
            if let Some(button) = button {
                page.add_class(button, "loading");
            }

            let delivery = submitter.submit(page.form_data(form));
            let task_page = page.clone();
            let config = config.clone();
            page.spawn(async move {
                let page = task_page;
                match delivery.await {
                    Ok(()) => {
                        show_notification(
                            &page,
                            &config,
                            &config.contact.success_message,
                            NoticeKind::Success,
                        );
                        page.reset_form(form);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "contact form submission failed");
                        show_notification(
                            &page,
                            &config,
                            &config.contact.failure_message,
                            NoticeKind::Error,
                        );
                    }
                }
                if let Some(button) = button {
                    page.remove_class(button, "loading");
                }
                Ok(())
            });
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    fn contact_page() -> (Page, NodeId, NodeId, NodeId) {
        let page = Page::in_memory();
        let form = page.build("form").id("contact-form").append_to(page.body());
        let name = page.build("input").attr("name", "name").append_to(form);
        let message = page.build("textarea").attr("name", "message").append_to(form);
        page.build("button")
            .attr("type", "submit")
            .text("Send")
            .append_to(form);
        page.set_value(name, "Ada");
        page.set_value(message, "Hello");
        (page, form, name, message)
    }

    fn contact(page: &Page, failure_rate: f64) -> ContactComponent {
        ContactComponent::new(Arc::new(Config::default()), page.clone()).with_submitter(Rc::new(
            SimulatedSubmitter::new(Duration::from_millis(2000), failure_rate),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submission() {
        LocalSet::new()
            .run_until(async {
                let (page, form, name, message) = contact_page();
                let mut component = contact(&page, 0.0);
                component.init().unwrap();
                let button = page.query("button").unwrap();

                assert!(!page.submit(form), "native submission is prevented");
                assert!(page.has_class(button, "loading"));

                tokio::time::sleep(Duration::from_millis(2010)).await;
                assert!(!page.has_class(button, "loading"));
                let notice = page.query(".notification-success").unwrap();
                assert_eq!(page.text_content(notice), "Message sent successfully!");
                assert_eq!(page.value(name), "");
                assert_eq!(page.value(message), "");
                assert!(page.get_element_by_id("notification-styles").is_some());

                tokio::time::sleep(Duration::from_millis(5000)).await;
                assert!(page.style(notice, "animation").is_some());
                tokio::time::sleep(Duration::from_millis(300)).await;
                assert!(page.query(".notification").is_none());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submission_keeps_fields() {
        LocalSet::new()
            .run_until(async {
                let (page, form, name, _) = contact_page();
                let mut component = contact(&page, 1.0);
                component.init().unwrap();
                let button = page.query("button").unwrap();

                page.submit(form);
                tokio::time::sleep(Duration::from_millis(2010)).await;

                assert!(!page.has_class(button, "loading"));
                assert!(page.query(".notification-success").is_none());
                let notice = page.query(".notification-error").unwrap();
                assert!(page.text_content(notice).starts_with("Error sending message"));
                assert_eq!(page.value(name), "Ada");
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_styles_injected_once() {
        LocalSet::new()
            .run_until(async {
                let (page, form, _, _) = contact_page();
                let mut component = contact(&page, 0.0);
                component.init().unwrap();

                page.submit(form);
                page.submit(form);
                tokio::time::sleep(Duration::from_millis(2010)).await;

                assert_eq!(page.query_all(".notification").len(), 2);
                assert_eq!(page.query_all("style").len(), 1);
            })
            .await;
    }

    #[test]
    fn test_missing_form_is_tolerated() {
        let page = Page::in_memory();
        let mut component = contact(&page, 0.0);
        component.init().unwrap();
        assert_eq!(component.listener_count(), 0);
    }
}
