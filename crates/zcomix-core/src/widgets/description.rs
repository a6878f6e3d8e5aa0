//! "More" link that swaps a short description for the full one

use crate::dom::{Display, Dom};
use crate::error::CoreResult;
use crate::events::{EventContext, EventKind, Role, Trigger};
use crate::runtime::Widget;

const MORE_LINK_CLASS: &str = "desc_more_link";
const SHORT_CLASS: &str = "short_description";
const FULL_CLASS: &str = "full_description";

#[derive(Debug, Default)]
pub struct DescriptionToggle;

impl Widget for DescriptionToggle {
    fn name(&self) -> &str {
        "description"
    }

    fn install(&mut self, dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()> {
        for link in dom.elements_by_class(dom.root(), MORE_LINK_CLASS) {
            ctx.listen(link, EventKind::Click, Role::MoreLink);
        }
        Ok(())
    }

    fn handle(
        &mut self,
        dom: &mut dyn Dom,
        trigger: &Trigger<'_>,
        ctx: &mut EventContext,
    ) -> CoreResult<()> {
        if trigger.role != Role::MoreLink {
            return Ok(());
        }
        ctx.prevent_default();

        let Some(short) = dom.parent(trigger.node).filter(|p| dom.has_class(*p, SHORT_CLASS)) else {
            log::debug!("description: more link outside a short description");
            return Ok(());
        };
        dom.set_display(short, Display::None);
        for full in dom.next_siblings(short) {
            if dom.has_class(full, FULL_CLASS) {
                dom.remove_class(full, "hidden");
                dom.set_display(full, Display::Default);
            }
        }
        Ok(())
    }
}
