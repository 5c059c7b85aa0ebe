use crate::Result;
use crate::dom::{Document, ElementId};
use crate::options::ResolvedToast;
use crate::types::{Glyph, ToastKind};

use super::listeners::{Event, Listener};
use super::{
    CLOSE_BUTTON_CLASS, ICON_CLASS, MESSAGE_CLASS, Notifier, TOAST_CLASS, ToastEntry,
};

/// Right margin given to the element before the close button.
const CLOSE_BUTTON_GAP: &str = "20px";

impl<D: Document> Notifier<D> {
    /// Creates a detached toast element and registers it. The caller attaches
    /// it to the tray.
    pub(super) fn build_notification(
        &mut self,
        message: &str,
        toast: &ResolvedToast,
    ) -> Result<ElementId> {
        let config = &toast.config;
        self.ensure_tray(config.position)?;

        let el = self.document.create_element("div");
        self.document.add_class(el, TOAST_CLASS)?;
        self.document
            .add_class(el, &format!("{TOAST_CLASS}__{}", toast.kind))?;

        if let Some(classes) = &config.custom_class {
            for class in classes.split_whitespace() {
                self.document.add_class(el, class)?;
            }
        }
        if let Some(color) = &config.custom_bg_color {
            self.document.set_style(el, "background-color", color)?;
        }

        if config.use_icons {
            let icon = self.build_icon(toast.kind, config.custom_icon.as_deref())?;
            self.document.append_child(el, icon)?;
        }

        let text = self.document.create_element("span");
        self.document.add_class(text, MESSAGE_CLASS)?;
        self.document.set_inner_html(text, message)?;
        self.document.append_child(el, text)?;

        let close_button = if config.close_button {
            Some(self.build_close_button(el)?)
        } else {
            None
        };

        if let Some(callback) = &config.on_click {
            self.document.set_style(el, "cursor", "pointer")?;
            self.listeners
                .add(el, Event::Click, Listener::Callback(el, callback.clone()));
        }

        self.toasts.insert(
            el,
            ToastEntry {
                kind: toast.kind,
                close_button,
                auto_close: None,
                timer: None,
                fading: false,
            },
        );
        Ok(el)
    }

    fn build_icon(&mut self, kind: ToastKind, custom_icon: Option<&str>) -> Result<ElementId> {
        let wrapper = self.document.create_element("span");
        self.document.add_class(wrapper, ICON_CLASS)?;

        let glyph = self.document.create_element("i");
        let class_name = custom_icon.unwrap_or_else(|| kind.glyph().class_name());
        self.document.set_class_name(glyph, class_name)?;
        self.document.append_child(wrapper, glyph)?;
        Ok(wrapper)
    }

    fn build_close_button(&mut self, toast: ElementId) -> Result<ElementId> {
        let button = self.document.create_element("span");
        self.document.add_class(button, CLOSE_BUTTON_CLASS)?;

        let glyph = self.document.create_element("i");
        self.document
            .set_class_name(glyph, Glyph::Xmark.class_name())?;
        self.document.append_child(button, glyph)?;
        self.document.append_child(toast, button)?;

        if let Some(previous) = self.document.previous_sibling(button) {
            self.document
                .set_style(previous, "margin-right", CLOSE_BUTTON_GAP)?;
        }

        self.listeners
            .add(button, Event::Click, Listener::Close(toast));
        Ok(button)
    }
}
