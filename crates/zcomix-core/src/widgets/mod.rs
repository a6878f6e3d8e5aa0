//! Page widgets
//!
//! - slideshow: gallery state machine and its DOM binding
//! - contribute: contribution amount validation
//! - description: short/full description toggle
//! - currency: numeric field formatting
//! - notices: viewport width and unfinished-feature alerts

pub mod contribute;
pub mod currency;
pub mod description;
pub mod notices;
pub mod slideshow;

pub use contribute::ContributeWidget;
pub use currency::CurrencyFields;
pub use description::DescriptionToggle;
pub use notices::PageNotices;
pub use slideshow::{GalleryWidget, SlideShow};

use crate::dom::Dom;
use crate::runtime::PageRuntime;
use zcomix_config::Config;

/// Install every widget the page markup calls for.
///
/// Galleries and contribution scopes missing from the page are skipped
/// with a log line. Returns the number of widgets installed.
pub fn install_page_widgets<D: Dom>(runtime: &mut PageRuntime<D>, config: &Config) -> usize {
    let mut installed = 0;

    for gallery in &config.slideshow.galleries {
        match runtime.install(Box::new(GalleryWidget::new(gallery, &config.slideshow))) {
            Ok(_) => installed += 1,
            Err(e) => log::debug!("skipping gallery {}: {}", gallery, e),
        }
    }

    let root = runtime.dom().root();
    let scopes = runtime.dom().elements_by_class(root, contribute::WIDGET_CLASS);
    for scope in scopes {
        match runtime.install(Box::new(ContributeWidget::new(scope, &config.contribute))) {
            Ok(_) => installed += 1,
            Err(e) => e.log("contribute"),
        }
    }

    let always: [Box<dyn crate::runtime::Widget>; 3] = [
        Box::new(DescriptionToggle),
        Box::new(CurrencyFields::new(&config.formatting)),
        Box::new(PageNotices::new(&config.notices)),
    ];
    for widget in always {
        match runtime.install(widget) {
            Ok(_) => installed += 1,
            Err(e) => e.log("install"),
        }
    }

    log::info!("installed {} page widgets", installed);
    installed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Page};

    #[test]
    fn test_installs_what_the_page_has() {
        let mut page = Page::new(1024);
        let root = page.root();
        let gallery = page.append(root, Element::new("div").id("reader_page"));
        let slide = page.append(gallery, Element::new("div").id("img-0").class("slide"));
        page.append(slide, Element::image(10, 10));
        page.append(root, Element::new("div").class("contribute_widget"));
        let widget = page.append(root, Element::new("div").class("contribute_widget"));
        page.append(widget, Element::new("a").id("contribute_link"));

        let mut config = Config::default();
        config.slideshow.galleries.push("reader_section".to_string());
        let mut runtime = PageRuntime::new(page);

        // reader_page, one complete contribute scope, description, currency, notices
        assert_eq!(install_page_widgets(&mut runtime, &config), 5);
        assert_eq!(runtime.widget_count(), 5);
        assert_eq!(runtime.pending_timers(), 2);
    }
}
