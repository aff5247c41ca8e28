//! Form Dialog View
//!
//! Modal hosting a [`DialogController`]. Submit and cancel callbacks run on
//! spawned tasks; their results go back through the controller.

use std::rc::Rc;

use gpui::{
    AnyElement, App, Context, EventEmitter, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::*,
};
use gpui_component::{h_flex, v_flex};

use super::modal::Modal;
use super::node::{Dispatch, paint};
use crate::components::primitives::TextInputs;
use crate::dialog::{CancelRequest, DialogController, DialogEffect, DialogEvent, DialogItem, SubmitRequest};
use crate::theme::TableColors;
use crate::value::FormData;

/// Emitted after a successful submit with the submitted form
#[derive(Debug, Clone)]
pub struct SubmittedEvent(pub FormData);

/// Form dialog view
pub struct FormDialog {
    controller: DialogController,
    inputs: TextInputs,
}

impl EventEmitter<SubmittedEvent> for FormDialog {}

impl FormDialog {
    /// Create a hidden dialog over a controller
    pub fn new(controller: DialogController, _cx: &mut Context<Self>) -> Self {
        Self {
            controller,
            inputs: TextInputs::default(),
        }
    }

    /// The underlying controller
    pub fn controller(&self) -> &DialogController {
        &self.controller
    }

    /// Open with an initial form
    pub fn show(&mut self, data: FormData, cx: &mut Context<Self>) {
        self.controller.show(data);
        cx.notify();
    }

    /// Close without running the cancel callback
    pub fn hide(&mut self, cx: &mut Context<Self>) {
        self.controller.hide();
        cx.notify();
    }

    fn handle_event(&mut self, event: DialogEvent, cx: &mut Context<Self>) {
        match self.controller.handle(event) {
            DialogEffect::None => {}
            DialogEffect::Submit(request) => self.run_submit(request, cx),
            DialogEffect::Cancel(request) => self.run_cancel(request, cx),
        }
        cx.notify();
    }

    fn run_submit(&mut self, request: SubmitRequest, cx: &mut Context<Self>) {
        let form = request.form().clone();
        cx.spawn(async move |this, cx| {
            let result = request.run().await;
            let _ = this.update(cx, |dialog, cx| {
                match dialog.controller.finish_submit(result) {
                    Ok(()) => cx.emit(SubmittedEvent(form)),
                    Err(e) => tracing::error!("Form dialog submit failed: {}", e),
                }
                cx.notify();
            });
        })
        .detach();
    }

    fn run_cancel(&mut self, request: CancelRequest, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            let result = request.run().await;
            let _ = this.update(cx, |dialog, cx| {
                dialog.controller.finish_cancel(result);
                cx.notify();
            });
        })
        .detach();
    }

    fn render_item(
        &mut self,
        index: usize,
        item: &DialogItem,
        dispatch: &Dispatch<DialogEvent>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let id = format!("dialog-item-{}", item.key.as_deref().unwrap_or(&index.to_string()));
        let content = paint(&id, &item.content, dispatch, &mut self.inputs, window, cx);

        v_flex()
            .gap_1()
            .child(
                h_flex()
                    .gap_1()
                    .text_sm()
                    .text_color(TableColors::text_secondary())
                    .when(item.required, |el| {
                        el.child(div().text_color(TableColors::danger()).child("*"))
                    })
                    .child(item.label.clone()),
            )
            .child(content)
            .when_some(item.error.clone(), |el, error| {
                el.child(div().text_xs().text_color(TableColors::danger()).child(error))
            })
            .into_any_element()
    }
}

impl Render for FormDialog {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let view = self.controller.render();
        if !view.visible {
            return div().into_any_element();
        }

        let entity = cx.entity().downgrade();
        let dispatch: Dispatch<DialogEvent> = Rc::new(move |event: DialogEvent, _window: &mut Window, cx: &mut App| {
            let _ = entity.update(cx, |dialog, cx| dialog.handle_event(event, cx));
        });

        let mut children = Vec::with_capacity(view.items.len() + 2);
        if let Some(before) = &view.before {
            children.push(paint("dialog-before", before, &dispatch, &mut self.inputs, window, cx));
        }
        for (index, item) in view.items.iter().enumerate() {
            children.push(self.render_item(index, item, &dispatch, window, cx));
        }
        if let Some(after) = &view.after {
            children.push(paint("dialog-after", after, &dispatch, &mut self.inputs, window, cx));
        }
        let footer = paint("dialog-footer", &view.footer, &dispatch, &mut self.inputs, window, cx);

        let close = dispatch.clone();
        Modal::new()
            .title(view.props.title.clone())
            .width(view.props.width)
            .children(children)
            .footer(footer)
            .on_close(move |window, cx| close(DialogEvent::Cancel, window, cx))
            .into_any_element()
    }
}
