//! Dialog Controller
//!
//! Owns the form object and visibility of a form dialog.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use super::DialogEvent;
use super::rules::derive_rules;
use crate::descriptor::FieldDescriptor;
use crate::error::{Error, Result};
use crate::i18n::{self, Locale};
use crate::render::{ButtonKind, InputNode, Node};
use crate::validation::{self, FormValidator, Rules};
use crate::value::FormData;

/// Submit callback, receives the validated form
pub type SubmitFn = Arc<dyn Fn(FormData) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Cancel callback, receives the form as it was left
pub type CancelFn = Arc<dyn Fn(FormData) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Caller region rendered against the form
pub type Slot = Arc<dyn Fn(&FormData) -> Node<DialogEvent> + Send + Sync>;

/// Modal properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogProps {
    pub title: Option<String>,
    /// Modal width in pixels
    pub width: Option<f32>,
}

/// Async work the host must run after an event
#[derive(Debug)]
pub enum DialogEffect {
    None,
    Submit(SubmitRequest),
    Cancel(CancelRequest),
}

/// Validation plus submit callback, prepared by [`DialogController::begin_submit`]
pub struct SubmitRequest {
    rules: Rules,
    form: FormData,
    submit: Option<SubmitFn>,
}

impl SubmitRequest {
    /// Form snapshot that is validated and submitted
    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Validate, then call the submit callback
    pub fn run(self) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            validation::validate(&self.rules, &self.form).await?;
            match &self.submit {
                Some(submit) => submit(self.form.clone()).await,
                None => Ok(()),
            }
        })
    }
}

impl fmt::Debug for SubmitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitRequest")
            .field("form", &self.form)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

/// Cancel callback, prepared by [`DialogController::begin_cancel`]
pub struct CancelRequest {
    form: FormData,
    cancel: Option<CancelFn>,
}

impl CancelRequest {
    /// Call the cancel callback
    pub fn run(self) -> BoxFuture<'static, Result<()>> {
        match self.cancel {
            Some(cancel) => cancel(self.form),
            None => Box::pin(async { Ok(()) }),
        }
    }
}

impl fmt::Debug for CancelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelRequest")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

/// One labeled form item
#[derive(Debug, Clone)]
pub struct DialogItem {
    pub label: String,
    pub key: Option<String>,
    /// Show the required marker
    pub required: bool,
    /// Validation marker
    pub error: Option<String>,
    pub content: Node<DialogEvent>,
}

/// Render output of the dialog
#[derive(Debug, Clone)]
pub struct DialogView {
    pub visible: bool,
    pub props: DialogProps,
    pub before: Option<Node<DialogEvent>>,
    pub items: Vec<DialogItem>,
    pub after: Option<Node<DialogEvent>>,
    pub footer: Node<DialogEvent>,
}

/// Form dialog state
pub struct DialogController {
    fields: Vec<FieldDescriptor>,
    form: FormData,
    visible: bool,
    submitting: bool,
    submit: Option<SubmitFn>,
    cancel: Option<CancelFn>,
    validator: FormValidator,
    clear_pending: bool,
    props: DialogProps,
    before: Option<Slot>,
    after: Option<Slot>,
    footer: Option<Slot>,
    locale: Locale,
}

impl DialogController {
    /// Create a hidden dialog over a list of fields
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for field in &fields {
            match field.key.as_deref() {
                Some("") => {
                    return Err(Error::Invalid {
                        message: format!("field '{}' has an empty key", field.label),
                    });
                }
                Some(key) if !seen.insert(key) => {
                    return Err(Error::Invalid {
                        message: format!("duplicate form key '{key}'"),
                    });
                }
                _ => {}
            }
        }
        Ok(Self {
            fields,
            form: FormData::new(),
            visible: false,
            submitting: false,
            submit: None,
            cancel: None,
            validator: FormValidator::default(),
            clear_pending: false,
            props: DialogProps::default(),
            before: None,
            after: None,
            footer: None,
            locale: Locale::default(),
        })
    }

    /// Set the submit callback
    pub fn on_submit(
        mut self,
        submit: impl Fn(FormData) -> BoxFuture<'static, Result<()>> + Send + Sync + 'static,
    ) -> Self {
        self.submit = Some(Arc::new(submit));
        self
    }

    /// Set the cancel callback
    pub fn on_cancel_with(
        mut self,
        cancel: impl Fn(FormData) -> BoxFuture<'static, Result<()>> + Send + Sync + 'static,
    ) -> Self {
        self.cancel = Some(Arc::new(cancel));
        self
    }

    /// Set the modal title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.props.title = Some(title.into());
        self
    }

    /// Set the modal width
    pub fn width(mut self, width: f32) -> Self {
        self.props.width = Some(width);
        self
    }

    /// Region above the form items
    pub fn before(mut self, slot: impl Fn(&FormData) -> Node<DialogEvent> + Send + Sync + 'static) -> Self {
        self.before = Some(Arc::new(slot));
        self
    }

    /// Region below the form items
    pub fn after(mut self, slot: impl Fn(&FormData) -> Node<DialogEvent> + Send + Sync + 'static) -> Self {
        self.after = Some(Arc::new(slot));
        self
    }

    /// Replace the confirm and cancel buttons
    pub fn footer(mut self, slot: impl Fn(&FormData) -> Node<DialogEvent> + Send + Sync + 'static) -> Self {
        self.footer = Some(Arc::new(slot));
        self
    }

    /// Locale of the default texts
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    // ==================== State ====================

    /// Current form
    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Whether the dialog is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a submit is in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validation markers
    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// Open with an initial form; every configured key ends up present
    pub fn show(&mut self, initial: FormData) {
        let mut form = initial;
        for key in self.fields.iter().filter_map(|f| f.key.as_deref()) {
            form.ensure_key(key);
        }
        tracing::debug!(keys = form.len(), "Showing dialog");
        self.form = form;
        self.visible = true;
        self.clear_pending = true;
    }

    /// Close without callbacks
    pub fn hide(&mut self) {
        self.visible = false;
        self.submitting = false;
    }

    /// Bind a new value to a form key
    pub fn input(&mut self, key: &str, value: Option<Value>) {
        if !self.form.contains_key(key) && !self.fields.iter().any(|f| f.key.as_deref() == Some(key)) {
            tracing::warn!(key, "Input for unknown form key");
        }
        self.form.set(key, value);
    }

    /// Effective rules for the current form
    pub fn rules(&self) -> Rules {
        derive_rules(&self.fields, &self.form, self.locale)
    }

    // ==================== Submit / cancel ====================

    /// First phase of a submit
    pub fn begin_submit(&mut self) -> SubmitRequest {
        self.submitting = true;
        // Markers from this submit must survive the next render
        self.clear_pending = false;
        SubmitRequest {
            rules: self.rules(),
            form: self.form.clone(),
            submit: self.submit.clone(),
        }
    }

    /// Second phase of a submit: record markers, hide on success
    pub fn finish_submit(&mut self, result: Result<()>) -> Result<()> {
        self.submitting = false;
        match &result {
            Ok(()) => {
                self.validator.clear();
                self.visible = false;
            }
            Err(Error::Validation { .. }) => self.validator.apply(&result),
            Err(err) => tracing::warn!(error = %err, "Dialog submit failed"),
        }
        result
    }

    /// Validate and submit; the dialog stays open on any error
    pub async fn submit(&mut self) -> Result<()> {
        let result = self.begin_submit().run().await;
        self.finish_submit(result)
    }

    /// First phase of a cancel
    pub fn begin_cancel(&self) -> CancelRequest {
        CancelRequest {
            form: self.form.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Second phase of a cancel: hide whatever the callback returned
    pub fn finish_cancel(&mut self, result: Result<()>) {
        if let Err(err) = result {
            tracing::warn!(error = %err, "Dialog cancel callback failed");
        }
        self.hide();
    }

    /// Run the cancel callback and hide
    pub async fn on_cancel(&mut self) {
        let result = self.begin_cancel().run().await;
        self.finish_cancel(result);
    }

    /// Apply an event and return the async work it needs
    pub fn handle(&mut self, event: DialogEvent) -> DialogEffect {
        match event {
            DialogEvent::Input { key, value } => {
                self.input(&key, value);
                DialogEffect::None
            }
            DialogEvent::Submit => DialogEffect::Submit(self.begin_submit()),
            DialogEvent::Cancel => DialogEffect::Cancel(self.begin_cancel()),
        }
    }

    /// Apply an event and run its effect to completion
    pub async fn dispatch(&mut self, event: DialogEvent) -> Result<()> {
        match self.handle(event) {
            DialogEffect::None => Ok(()),
            DialogEffect::Submit(request) => {
                let result = request.run().await;
                self.finish_submit(result)
            }
            DialogEffect::Cancel(request) => {
                let result = request.run().await;
                self.finish_cancel(result);
                Ok(())
            }
        }
    }

    // ==================== Rendering ====================

    fn render_field(&self, field: &FieldDescriptor) -> Node<DialogEvent> {
        if let Some(render) = &field.render {
            return render(&self.form);
        }
        let Some(key) = field.key.clone() else {
            return Node::Empty;
        };
        Node::Input(InputNode {
            widget: field.widget.clone(),
            value: field.data_type.coerce(self.form.get(&key)),
            placeholder: field.placeholder.clone(),
            clearable: false,
            options: field.options.clone(),
            props: field.widget_props.clone(),
            attrs: field.attrs.clone(),
            on_input: Arc::new(move |value| DialogEvent::Input {
                key: key.clone(),
                value,
            }),
        })
    }

    fn default_footer(&self) -> Node<DialogEvent> {
        Node::Group(vec![
            Node::Button {
                label: i18n::t(self.locale, "dialog-confirm"),
                kind: ButtonKind::Primary,
                loading: self.submitting,
                on_click: DialogEvent::Submit,
            },
            Node::Button {
                label: i18n::t(self.locale, "dialog-cancel"),
                kind: ButtonKind::Default,
                loading: false,
                on_click: DialogEvent::Cancel,
            },
        ])
    }

    /// Render tree; the first render after `show` drops stale markers
    pub fn render(&mut self) -> DialogView {
        if std::mem::take(&mut self.clear_pending) {
            self.validator.clear();
        }
        let items = self
            .fields
            .iter()
            .filter(|field| field.is_visible(&self.form))
            .map(|field| DialogItem {
                label: field.label.clone(),
                key: field.key.clone(),
                required: field.is_required(&self.form),
                error: field
                    .key
                    .as_deref()
                    .and_then(|key| self.validator.error(key))
                    .map(str::to_string),
                content: self.render_field(field),
            })
            .collect();
        DialogView {
            visible: self.visible,
            props: self.props.clone(),
            before: self.before.as_ref().map(|slot| slot(&self.form)),
            items,
            after: self.after.as_ref().map(|slot| slot(&self.form)),
            footer: match &self.footer {
                Some(slot) => slot(&self.form),
                None => self.default_footer(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::descriptor::{Choice, DataType, Flag, Rule, Widget};
    use serde_json::json;

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("name", "Name").required(true),
            FieldDescriptor::new("age", "Age").data_type(DataType::Number),
            FieldDescriptor::new("kind", "Kind")
                .widget(Widget::RadioGroup)
                .options(vec![Choice::new("person", "Person"), Choice::new("company", "Company")]),
            FieldDescriptor::new("tax_id", "Tax ID")
                .show(Flag::when(|form| form.get("kind") == Some(&json!("company")))),
        ]
    }

    #[test]
    fn test_show_fills_every_key() {
        let mut dialog = DialogController::new(fields()).expect("dialog");
        assert!(!dialog.is_visible());
        dialog.show(FormData::from_value(json!({"name": "bob", "extra": 1})));
        assert!(dialog.is_visible());
        for key in ["name", "age", "kind", "tax_id", "extra"] {
            assert!(dialog.form().contains_key(key), "missing {key}");
        }
        assert_eq!(dialog.form().get("age"), None);
        assert_eq!(dialog.form().get("name"), Some(&json!("bob")));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let fields = vec![FieldDescriptor::new("a", "A"), FieldDescriptor::new("a", "Again")];
        assert!(DialogController::new(fields).is_err());
        assert!(DialogController::new(vec![FieldDescriptor::new("", "Blank")]).is_err());
    }

    #[tokio::test]
    async fn test_submit_requires_valid_form() {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let sink = submitted.clone();
        let mut dialog = DialogController::new(fields())
            .expect("dialog")
            .locale(Locale::EnUS)
            .on_submit(move |form| {
                if let Ok(mut seen) = sink.lock() {
                    seen.push(form.to_value());
                }
                Box::pin(async { Ok(()) })
            });
        dialog.show(FormData::new());

        let err = dialog.submit().await.expect_err("name missing");
        assert!(matches!(err, Error::Validation { .. }));
        assert!(dialog.is_visible());
        let view = dialog.render();
        assert_eq!(view.items[0].error.as_deref(), Some("Name is required"));
        assert!(view.items[0].required);

        dialog.handle(DialogEvent::Input {
            key: "name".to_string(),
            value: Some(json!("bob")),
        });
        dialog.dispatch(DialogEvent::Submit).await.expect("submit");
        assert!(!dialog.is_visible());
        assert_eq!(
            submitted.lock().map(|s| s.clone()).unwrap_or_default(),
            vec![json!({"name": "bob"})]
        );
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_dialog_open() {
        let mut dialog = DialogController::new(vec![FieldDescriptor::new("name", "Name")])
            .expect("dialog")
            .on_submit(|_| Box::pin(async { Err(Error::callback("server said no")) }));
        dialog.show(FormData::new());
        let err = dialog.submit().await.expect_err("submit fails");
        assert!(matches!(err, Error::Callback { .. }));
        assert!(dialog.is_visible());
        assert!(!dialog.is_submitting());
    }

    #[tokio::test]
    async fn test_cancel_hides_even_on_failure() {
        let mut dialog = DialogController::new(fields())
            .expect("dialog")
            .on_cancel_with(|_| Box::pin(async { Err(Error::callback("busy")) }));
        dialog.show(FormData::new());
        dialog.on_cancel().await;
        assert!(!dialog.is_visible());

        dialog.show(FormData::new());
        dialog.dispatch(DialogEvent::Cancel).await.expect("cancel");
        assert!(!dialog.is_visible());
    }

    #[tokio::test]
    async fn test_show_clears_stale_markers() {
        let mut dialog = DialogController::new(fields()).expect("dialog");
        dialog.show(FormData::new());
        assert!(dialog.submit().await.is_err());
        assert!(dialog.validator().error("name").is_some());

        dialog.show(FormData::new());
        let view = dialog.render();
        assert!(view.items.iter().all(|item| item.error.is_none()));
    }

    #[tokio::test]
    async fn test_default_locale_required_message() {
        let mut dialog = DialogController::new(fields()).expect("dialog");
        dialog.show(FormData::new());
        assert!(dialog.submit().await.is_err());
        assert_eq!(dialog.render().items[0].error.as_deref(), Some("Name必填"));
    }

    #[tokio::test]
    async fn test_markers_survive_render_after_show() {
        let mut dialog = DialogController::new(fields()).expect("dialog").locale(Locale::EnUS);
        dialog.show(FormData::new());
        assert!(dialog.dispatch(DialogEvent::Submit).await.is_err());

        let view = dialog.render();
        assert_eq!(view.items[0].error.as_deref(), Some("Name is required"));
        assert_eq!(dialog.render().items[0].error.as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_submit_request_carries_snapshot() {
        let mut dialog = DialogController::new(fields()).expect("dialog");
        dialog.show(FormData::from_value(json!({"name": "bob"})));
        let request = dialog.begin_submit();
        dialog.input("name", Some(json!("alice")));

        assert_eq!(request.form().get("name"), Some(&json!("bob")));
        assert_eq!(dialog.form().get("name"), Some(&json!("alice")));
    }

    #[test]
    fn test_render_items() {
        let mut dialog = DialogController::new(fields())
            .expect("dialog")
            .locale(Locale::EnUS)
            .title("Edit user")
            .width(480.0)
            .before(|form| Node::text(format!("{} keys", form.len())));
        dialog.show(FormData::from_value(json!({"age": "42"})));

        let view = dialog.render();
        assert_eq!(view.props.title.as_deref(), Some("Edit user"));
        assert_eq!(view.before.as_ref().map(Node::text_content).as_deref(), Some("4 keys"));
        let labels: Vec<_> = view.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Name", "Age", "Kind"]);

        let Node::Input(age) = &view.items[1].content else {
            panic!("expected input");
        };
        assert_eq!(age.value, Some(json!(42)));
        assert_eq!(dialog.form().get("age"), Some(&json!("42")));
        assert_eq!(
            age.input(Some(json!("43"))),
            DialogEvent::Input { key: "age".to_string(), value: Some(json!("43")) }
        );

        let Node::Input(kind) = &view.items[2].content else {
            panic!("expected radio group");
        };
        assert_eq!(kind.options.len(), 2);
        assert_eq!(view.footer.text_content(), "Confirm Cancel");

        dialog.input("kind", Some(json!("company")));
        assert_eq!(dialog.render().items.len(), 4);
    }

    #[test]
    fn test_custom_render_and_footer() {
        let mut dialog = DialogController::new(vec![
            FieldDescriptor::new("status", "Status")
                .render(|form| Node::text(format!("status={}", crate::value::display(form.get("status")))))
                .rule(Rule::required("pick one")),
            FieldDescriptor::display("Hint", |_| Node::text("read only")),
        ])
        .expect("dialog")
        .footer(|_| Node::Button {
            label: "Save".to_string(),
            kind: ButtonKind::Primary,
            loading: false,
            on_click: DialogEvent::Submit,
        });
        dialog.show(FormData::from_value(json!({"status": 1})));
        let view = dialog.render();
        assert_eq!(view.items[0].content.text_content(), "status=1");
        assert_eq!(view.items[1].content.text_content(), "read only");
        assert_eq!(view.footer.text_content(), "Save");
    }
}
