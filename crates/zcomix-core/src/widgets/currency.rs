//! Reformat numeric fields when their value changes

use crate::dom::Dom;
use crate::error::CoreResult;
use crate::events::{EventContext, EventKind, FieldPreset, Role, Trigger};
use crate::runtime::Widget;
use zcomix_config::{FormatSettings, FormattingConfig};
use zcomix_format::format_number;

const CURRENCY_CLASS: &str = "currency";
const CURRENCY_OR_BLANK_CLASS: &str = "currency_or_blank";

#[derive(Debug)]
pub struct CurrencyFields {
    currency: FormatSettings,
    currency_or_blank: FormatSettings,
}

impl CurrencyFields {
    pub fn new(config: &FormattingConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            currency_or_blank: config.currency_or_blank.clone(),
        }
    }

    fn settings(&self, preset: FieldPreset) -> &FormatSettings {
        match preset {
            FieldPreset::Currency => &self.currency,
            FieldPreset::CurrencyOrBlank => &self.currency_or_blank,
        }
    }
}

impl Widget for CurrencyFields {
    fn name(&self) -> &str {
        "currency"
    }

    fn install(&mut self, dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()> {
        let root = dom.root();
        for (class, preset) in [
            (CURRENCY_CLASS, FieldPreset::Currency),
            (CURRENCY_OR_BLANK_CLASS, FieldPreset::CurrencyOrBlank),
        ] {
            for field in dom.elements_by_class(root, class) {
                ctx.listen(field, EventKind::Change, Role::NumericField(preset));
            }
        }
        Ok(())
    }

    fn handle(
        &mut self,
        dom: &mut dyn Dom,
        trigger: &Trigger<'_>,
        _ctx: &mut EventContext,
    ) -> CoreResult<()> {
        let Role::NumericField(preset) = trigger.role else {
            return Ok(());
        };
        let raw = dom.value(trigger.node);
        let formatted = format_number(&raw, self.settings(preset));
        if formatted != raw {
            dom.set_value(trigger.node, &formatted);
        }
        Ok(())
    }
}
