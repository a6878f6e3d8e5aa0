//! Viewport width display and alerts for unfinished features

use crate::dom::Dom;
use crate::error::CoreResult;
use crate::events::{Effect, EventContext, EventKind, Role, TimerTag, Trigger};
use crate::runtime::Widget;
use zcomix_config::NoticesConfig;

const FIXME_CLASS: &str = "fixme";
const VIEWPORT_ID: &str = "viewport_info";

#[derive(Debug)]
pub struct PageNotices {
    delay_ms: u64,
    message: String,
}

impl PageNotices {
    pub fn new(config: &NoticesConfig) -> Self {
        Self {
            delay_ms: config.delay_ms,
            message: config.message.clone(),
        }
    }

    fn show_viewport_size(dom: &mut dyn Dom) {
        if let Some(info) = dom.element_by_id(dom.root(), VIEWPORT_ID) {
            let width = dom.window_width().to_string();
            dom.set_content(info, &width);
        }
    }
}

impl Widget for PageNotices {
    fn name(&self) -> &str {
        "notices"
    }

    fn install(&mut self, dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()> {
        ctx.schedule(self.delay_ms, TimerTag::ArmNotices);
        Self::show_viewport_size(dom);
        Ok(())
    }

    fn handle(
        &mut self,
        dom: &mut dyn Dom,
        trigger: &Trigger<'_>,
        ctx: &mut EventContext,
    ) -> CoreResult<()> {
        match trigger.role {
            Role::FixmeLink => {
                ctx.emit(Effect::Alert(self.message.clone()));
                ctx.prevent_default();
            }
            Role::Window => Self::show_viewport_size(dom),
            _ => {}
        }
        Ok(())
    }

    fn on_timer(
        &mut self,
        dom: &mut dyn Dom,
        tag: TimerTag,
        ctx: &mut EventContext,
    ) -> CoreResult<()> {
        if tag != TimerTag::ArmNotices {
            return Ok(());
        }
        let root = dom.root();
        for link in dom.elements_by_class(root, FIXME_CLASS) {
            ctx.listen(link, EventKind::Click, Role::FixmeLink);
        }
        ctx.listen(root, EventKind::Resize, Role::Window);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Page};
    use crate::events::Event;
    use crate::runtime::PageRuntime;

    #[test]
    fn test_notices_arm_after_delay() {
        let mut page = Page::new(1024);
        let info = page.append(page.root(), Element::new("span").id("viewport_info"));
        let fixme = page.append(page.root(), Element::new("a").class("fixme"));
        let mut runtime = PageRuntime::new(page);
        runtime.install(Box::new(PageNotices::new(&NoticesConfig::default()))).unwrap();
        assert_eq!(runtime.dom().content(info), "1024");

        // Not armed yet.
        let outcome = runtime.dispatch(Event::click(fixme));
        assert!(outcome.effects.is_empty());
        runtime.dom_mut().set_window_width(800);
        let root = runtime.dom().root();
        runtime.dispatch(Event::new(EventKind::Resize, root));
        assert_eq!(runtime.dom().content(info), "1024");

        runtime.advance_time(1000);
        let outcome = runtime.dispatch(Event::click(fixme));
        assert!(outcome.default_prevented);
        assert_eq!(
            outcome.effects,
            vec![Effect::Alert("This feature is not working yet.".to_string())]
        );
        runtime.dispatch(Event::new(EventKind::Resize, root));
        assert_eq!(runtime.dom().content(info), "800");
    }
}
