//! Contribution amount widget
//!
//! Validates the typed amount when the contribute link is followed and
//! either opens the payment page with `amount=<normalized>` or shows the
//! inline error.

use crate::dom::{Dom, NodeId};
use crate::error::{CoreError, CoreResult};
use crate::events::{Effect, Event, EventContext, EventKind, Role, Trigger, KEY_ENTER};
use crate::runtime::Widget;
use zcomix_config::ContributeConfig;
use zcomix_format::validate_amount;

pub const WIDGET_CLASS: &str = "contribute_widget";
const AMOUNT_ID: &str = "contribute_amount";
const LINK_ID: &str = "contribute_link";
const ERROR_CLASS: &str = "contribute_error";
const INDENTED_CLASS: &str = "indented";
const ALERT_CLASSES: [&str; 2] = ["alert", "alert-danger"];

/// Append the amount query parameter to the link target
pub fn contribution_url(href: &str, amount: &str) -> String {
    let separator = if href.contains('?') { '&' } else { '?' };
    format!("{}{}amount={}", href, separator, urlencoding::encode(amount))
}

/// One `.contribute_widget` scope
#[derive(Debug)]
pub struct ContributeWidget {
    scope: NodeId,
    input: Option<NodeId>,
    link: Option<NodeId>,
    /// Amount used when the field is left empty, taken from its placeholder
    default_amount: String,
    error_message: String,
}

impl ContributeWidget {
    pub fn new(scope: NodeId, config: &ContributeConfig) -> Self {
        Self {
            scope,
            input: None,
            link: None,
            default_amount: String::new(),
            error_message: config.error_message.clone(),
        }
    }

    fn clear_errors(&self, dom: &mut dyn Dom) {
        for elem in dom.elements_by_class(self.scope, ERROR_CLASS) {
            for class in ALERT_CLASSES {
                dom.remove_class(elem, class);
            }
            dom.set_content(elem, "");
        }
    }

    fn show_errors(&self, dom: &mut dyn Dom) {
        let html = format!(
            "<span class=\"glyphicon glyphicon-remove\"></span>{}",
            self.error_message
        );
        for elem in dom.elements_by_class(self.scope, ERROR_CLASS) {
            for class in ALERT_CLASSES {
                dom.add_class(elem, class);
            }
            dom.set_content(elem, &html);
        }
    }

    fn contribute(
        &self,
        dom: &mut dyn Dom,
        link: NodeId,
        ctx: &mut EventContext,
    ) -> CoreResult<()> {
        ctx.prevent_default();
        let typed = self.input.map(|input| dom.value(input)).unwrap_or_default();
        let amount = if typed.is_empty() { self.default_amount.as_str() } else { typed.as_str() };

        match validate_amount(amount) {
            Ok(normalized) => {
                let href = dom.attribute(link, "href").unwrap_or_default();
                let url = contribution_url(&href, normalized.as_str());
                log::info!("contribute: opening {}", url);
                ctx.emit(Effect::OpenWindow(url));
                Ok(())
            }
            Err(e) => {
                self.show_errors(dom);
                Err(CoreError::from(e))
            }
        }
    }
}

impl Widget for ContributeWidget {
    fn name(&self) -> &str {
        "contribute"
    }

    fn install(&mut self, dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()> {
        let input = dom.element_by_id(self.scope, AMOUNT_ID);
        let link = dom.element_by_id(self.scope, LINK_ID).ok_or_else(|| {
            CoreError::ElementNotFound {
                selector: format!(".{} #{}", WIDGET_CLASS, LINK_ID),
            }
        })?;

        if let Some(input) = input {
            self.default_amount = dom.attribute(input, "placeholder").unwrap_or_default();
            ctx.listen(input, EventKind::Focus, Role::AmountInput);
            ctx.listen(input, EventKind::Blur, Role::AmountInput);
            ctx.listen(input, EventKind::KeyPress, Role::AmountInput);
        }
        ctx.listen(link, EventKind::Click, Role::ContributeLink);

        self.input = input;
        self.link = Some(link);
        Ok(())
    }

    fn handle(
        &mut self,
        dom: &mut dyn Dom,
        trigger: &Trigger<'_>,
        ctx: &mut EventContext,
    ) -> CoreResult<()> {
        match (trigger.role, trigger.event.kind) {
            (Role::AmountInput, EventKind::Focus) => {
                dom.remove_class(trigger.node, INDENTED_CLASS);
                self.clear_errors(dom);
            }
            (Role::AmountInput, EventKind::Blur) => {
                if dom.value(trigger.node).is_empty() {
                    dom.add_class(trigger.node, INDENTED_CLASS);
                } else {
                    dom.remove_class(trigger.node, INDENTED_CLASS);
                }
            }
            (Role::AmountInput, EventKind::KeyPress) => {
                if trigger.event.key_code == Some(KEY_ENTER) {
                    if let Some(link) = self.link {
                        dom.focus(link);
                        ctx.follow_up(Event::click(link));
                    }
                    ctx.prevent_default();
                    ctx.stop_propagation();
                }
            }
            (Role::ContributeLink, EventKind::Click) => {
                self.contribute(dom, trigger.node, ctx)?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Page};
    use crate::runtime::PageRuntime;

    struct Fixture {
        runtime: PageRuntime<Page>,
        input: NodeId,
        link: NodeId,
        errors: Vec<NodeId>,
    }

    fn fixture(typed: &str) -> Fixture {
        let mut page = Page::new(1024);
        let scope = page.append(page.root(), Element::new("div").class(WIDGET_CLASS));
        let input = page.append(
            scope,
            Element::new("input")
                .id("contribute_amount")
                .class("indented")
                .attr("placeholder", "5")
                .value(typed),
        );
        let link = page.append(
            scope,
            Element::new("a").id("contribute_link").attr("href", "/contributions/paypal"),
        );
        let errors = vec![
            page.append(scope, Element::new("div").class("contribute_error")),
            page.append(scope, Element::new("div").class("contribute_error")),
        ];
        let mut runtime = PageRuntime::new(page);
        runtime
            .install(Box::new(ContributeWidget::new(scope, &ContributeConfig::default())))
            .unwrap();
        Fixture { runtime, input, link, errors }
    }

    #[test]
    fn test_contribution_url() {
        assert_eq!(contribution_url("/pay", "10.00"), "/pay?amount=10.00");
        assert_eq!(contribution_url("/pay?to=7", "1,234.50"), "/pay?to=7&amount=1%2C234.50");
    }

    #[test]
    fn test_valid_amount_opens_window() {
        let mut f = fixture("10.5");
        let outcome = f.runtime.dispatch(Event::click(f.link));
        assert!(outcome.default_prevented);
        assert_eq!(
            outcome.effects,
            vec![Effect::OpenWindow("/contributions/paypal?amount=10.50".to_string())]
        );
    }

    #[test]
    fn test_empty_field_uses_placeholder() {
        let mut f = fixture("");
        let outcome = f.runtime.dispatch(Event::click(f.link));
        assert_eq!(
            outcome.effects,
            vec![Effect::OpenWindow("/contributions/paypal?amount=5.00".to_string())]
        );
    }

    #[test]
    fn test_invalid_amount_shows_error_then_focus_clears() {
        let mut f = fixture("12.345");
        let outcome = f.runtime.dispatch(Event::click(f.link));
        assert!(outcome.default_prevented);
        assert!(outcome.effects.is_empty());
        for err in &f.errors {
            let dom = f.runtime.dom();
            assert!(dom.has_class(*err, "alert"));
            assert!(dom.has_class(*err, "alert-danger"));
            assert!(dom.content(*err).ends_with("Invalid amount"));
        }

        f.runtime.dispatch(Event::new(EventKind::Focus, f.input));
        for err in &f.errors {
            let dom = f.runtime.dom();
            assert!(!dom.has_class(*err, "alert"));
            assert!(!dom.has_class(*err, "alert-danger"));
            assert_eq!(dom.content(*err), "");
        }
        assert!(!f.runtime.dom().has_class(f.input, "indented"));
    }

    #[test]
    fn test_blur_toggles_indent() {
        let mut f = fixture("");
        f.runtime.dispatch(Event::new(EventKind::Focus, f.input));
        f.runtime.dispatch(Event::new(EventKind::Blur, f.input));
        assert!(f.runtime.dom().has_class(f.input, "indented"));

        f.runtime.dom_mut().set_value(f.input, "3");
        f.runtime.dispatch(Event::new(EventKind::Blur, f.input));
        assert!(!f.runtime.dom().has_class(f.input, "indented"));
    }

    #[test]
    fn test_enter_submits() {
        let mut f = fixture("1,234");
        let outcome = f.runtime.dispatch(Event::key_press(f.input, KEY_ENTER));
        assert!(outcome.default_prevented);
        assert!(outcome.propagation_stopped);
        assert_eq!(f.runtime.dom().focused(), Some(f.link));
        assert_eq!(
            outcome.effects,
            vec![Effect::OpenWindow("/contributions/paypal?amount=1%2C234.00".to_string())]
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut f = fixture("7");
        let outcome = f.runtime.dispatch(Event::key_press(f.input, 'a' as u32));
        assert!(!outcome.default_prevented);
        assert!(outcome.effects.is_empty());
    }
}
