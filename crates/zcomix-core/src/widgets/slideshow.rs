//! Single-slide image gallery with navigation dots
//!
//! [`SlideShow`] is the index state machine; [`GalleryWidget`] binds one to
//! a gallery root in the document. Markup inside the root:
//!
//! - `.slide#img-<n>`, each holding one `<img>`
//! - `.nav-dot#img-dot-<n>`
//! - `#container` and `.nav` strips, sized to the visible image

use crate::dom::{Display, Dom, ImageSize, NodeId};
use crate::error::{CoreError, CoreResult};
use crate::events::{EventContext, EventKind, Role, TimerTag, Trigger};
use crate::runtime::Widget;
use zcomix_config::SlideShowConfig;

const SLIDE_CLASS: &str = "slide";
const DOT_CLASS: &str = "nav-dot";
const NAV_CLASS: &str = "nav";
const CONTAINER_ID: &str = "container";
const SLIDE_PREFIX: &str = "img-";
const DOT_PREFIX: &str = "img-dot-";

/// Index following `current` in a gallery of `count` slides
pub fn next_index(current: usize, count: usize) -> usize {
    if current + 1 >= count {
        0
    } else {
        current + 1
    }
}

/// Current-slide state of one gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideShow {
    count: usize,
    current: Option<usize>,
}

impl SlideShow {
    pub fn new(count: usize) -> Self {
        Self { count, current: None }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Index of the last slide, `-1` for an empty gallery
    pub fn max_image(&self) -> isize {
        self.count as isize - 1
    }

    /// `None` until the first slide has been shown
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Show the first slide
    pub fn start(&mut self) -> CoreResult<usize> {
        self.jump_to(0)
    }

    /// Step past the slide that is actually visible, wrapping at the end
    pub fn advance_from(&mut self, visible: usize) -> CoreResult<usize> {
        self.check(visible)?;
        let next = next_index(visible, self.count);
        self.current = Some(next);
        Ok(next)
    }

    /// Step past the last rendered slide. `None` before the show started.
    pub fn advance(&mut self) -> Option<usize> {
        let current = self.current?;
        self.advance_from(current).ok()
    }

    pub fn jump_to(&mut self, index: usize) -> CoreResult<usize> {
        self.check(index)?;
        self.current = Some(index);
        Ok(index)
    }

    fn check(&self, index: usize) -> CoreResult<()> {
        if index >= self.count {
            return Err(CoreError::SlideOutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(())
    }
}

/// Parse the index out of an id such as `img-3` or `img-dot-3`
fn parse_index(id: &str, prefix: &str) -> CoreResult<usize> {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.parse::<usize>().ok())
        .ok_or_else(|| CoreError::MalformedIdentifier { id: id.to_string() })
}

/// Slide show bound to one gallery root
#[derive(Debug)]
pub struct GalleryWidget {
    root_id: String,
    root: Option<NodeId>,
    current_class: String,
    start_delay_ms: u64,
    state: SlideShow,
}

impl GalleryWidget {
    pub fn new(root_id: &str, config: &SlideShowConfig) -> Self {
        Self {
            root_id: root_id.to_string(),
            root: None,
            current_class: config.current_class.clone(),
            start_delay_ms: config.start_delay_ms,
            state: SlideShow::new(0),
        }
    }

    pub fn state(&self) -> &SlideShow {
        &self.state
    }

    fn root(&self) -> CoreResult<NodeId> {
        self.root.ok_or_else(|| CoreError::ElementNotFound {
            selector: format!("#{}", self.root_id),
        })
    }

    /// Index of the slide currently on screen, read from its id
    fn visible_slide(&self, dom: &dyn Dom, root: NodeId) -> CoreResult<Option<usize>> {
        let visible = dom
            .elements_by_class(root, SLIDE_CLASS)
            .into_iter()
            .find(|slide| dom.is_visible(*slide));
        match visible {
            Some(slide) => {
                let id = dom.id(slide).unwrap_or_default();
                parse_index(&id, SLIDE_PREFIX).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Show exactly slide `index` and mark its dot
    fn render(&self, dom: &mut dyn Dom, index: usize) -> CoreResult<()> {
        let root = self.root()?;
        let slide_id = format!("{}{}", SLIDE_PREFIX, index);
        let slide = dom
            .element_by_id(root, &slide_id)
            .ok_or_else(|| CoreError::ElementNotFound {
                selector: format!("#{} #{}", self.root_id, slide_id),
            })?;
        let ImageSize { width, height } = dom
            .children(slide)
            .into_iter()
            .find(|child| dom.tag(*child).as_deref() == Some("img"))
            .and_then(|img| dom.image_size(img))
            .ok_or(CoreError::MissingImage { index })?;

        for other in dom.elements_by_class(root, SLIDE_CLASS) {
            dom.set_display(other, Display::None);
        }

        let height_px = format!("{}px", height);
        if let Some(container) = dom.element_by_id(root, CONTAINER_ID) {
            dom.set_style(container, "height", &height_px);
            dom.set_style(container, "width", &format!("{}px", width));
        }
        for nav in dom.elements_by_class(root, NAV_CLASS) {
            dom.set_style(nav, "height", &height_px);
            dom.set_style(nav, "line-height", &height_px);
        }

        for dot in dom.elements_by_class(root, DOT_CLASS) {
            dom.remove_class(dot, &self.current_class);
        }
        if let Some(dot) = dom.element_by_id(root, &format!("{}{}", DOT_PREFIX, index)) {
            dom.add_class(dot, &self.current_class);
        }

        dom.set_display(slide, Display::InlineBlock);
        log::debug!("{}: showing slide {} ({}x{})", self.root_id, index, width, height);
        Ok(())
    }
}

impl Widget for GalleryWidget {
    fn name(&self) -> &str {
        "slideshow"
    }

    fn install(&mut self, dom: &mut dyn Dom, ctx: &mut EventContext) -> CoreResult<()> {
        let root = dom
            .element_by_id(dom.root(), &self.root_id)
            .ok_or_else(|| CoreError::ElementNotFound {
                selector: format!("#{}", self.root_id),
            })?;
        self.root = Some(root);

        let slides = dom.elements_by_class(root, SLIDE_CLASS);
        self.state = SlideShow::new(slides.len());
        for slide in slides {
            ctx.listen(slide, EventKind::Click, Role::Slide);
        }
        for dot in dom.elements_by_class(root, DOT_CLASS) {
            ctx.listen(dot, EventKind::Click, Role::Dot);
        }
        ctx.schedule(self.start_delay_ms, TimerTag::StartSlideShow);

        log::debug!(
            "{}: {} slides, max_image={}",
            self.root_id,
            self.state.count(),
            self.state.max_image()
        );
        Ok(())
    }

    fn handle(
        &mut self,
        dom: &mut dyn Dom,
        trigger: &Trigger<'_>,
        _ctx: &mut EventContext,
    ) -> CoreResult<()> {
        let root = self.root()?;
        let index = match trigger.role {
            Role::Slide => {
                let Some(visible) = self.visible_slide(dom, root)? else {
                    log::debug!("{}: slide clicked before the show started", self.root_id);
                    return Ok(());
                };
                self.state.advance_from(visible)?
            }
            Role::Dot => {
                let id = dom.id(trigger.node).unwrap_or_default();
                self.state.jump_to(parse_index(&id, DOT_PREFIX)?)?
            }
            _ => return Ok(()),
        };
        self.render(dom, index)
    }

    fn on_timer(
        &mut self,
        dom: &mut dyn Dom,
        tag: TimerTag,
        _ctx: &mut EventContext,
    ) -> CoreResult<()> {
        if tag != TimerTag::StartSlideShow {
            return Ok(());
        }
        if self.state.count() == 0 {
            log::debug!("{}: no slides to show", self.root_id);
            return Ok(());
        }
        let index = self.state.start()?;
        self.render(dom, index)
    }
}
