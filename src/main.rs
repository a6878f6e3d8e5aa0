//! zcomix-ui command line entry point
//!
//! Runs the page widgets headless: validate and format amounts, or replay
//! clicks against an in-memory reader page.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use zcomix_config::{Config, FormatSettings};
use zcomix_core::{install_page_widgets, Dom, Effect, Element, Event, NodeId, Page, PageRuntime};
use zcomix_format::{format_number, validate_amount};

#[derive(Parser, Debug)]
#[command(name = "zcomix-ui")]
#[command(version = "0.1.0")]
#[command(about = "Headless zcomix page widgets", long_about = None)]
struct Args {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a contribution amount
    Validate { amount: String },
    /// Format a number like a currency field would
    Format {
        num: String,
        #[arg(long, value_enum, default_value_t = Preset::Currency)]
        preset: Preset,
        #[arg(long)]
        places: Option<u32>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        point: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        suffix: Option<String>,
    },
    /// Replay clicks on a reader page slide show
    Slideshow {
        /// Image sizes as WIDTHxHEIGHT, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        slides: Vec<String>,
        /// `next` clicks the visible slide, a number clicks that dot
        #[arg(long, value_delimiter = ',')]
        clicks: Vec<String>,
    },
    /// Print the default configuration
    DefaultConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Currency,
    CurrencyOrBlank,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path.clone())
            .map_err(|e| anyhow::anyhow!("{}", e.to_details()))
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match args.command {
        Command::Validate { amount } => match validate_amount(&amount) {
            Ok(normalized) => println!("{}", normalized),
            Err(e) => bail!("{}", e),
        },
        Command::Format { num, preset, places, group, point, prefix, suffix } => {
            let base = match preset {
                Preset::Currency => &config.formatting.currency,
                Preset::CurrencyOrBlank => &config.formatting.currency_or_blank,
            };
            let overrides = Overrides { places, group, point, prefix, suffix };
            let settings = overrides.apply(base)?;
            println!("{}", format_number(&num, &settings));
        }
        Command::Slideshow { slides, clicks } => {
            let sizes = slides
                .iter()
                .map(|s| parse_size(s))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            rt.block_on(replay_slideshow(&config, &sizes, &clicks))?;
        }
        Command::DefaultConfig => print!("{}", Config::generate_default()),
    }

    Ok(())
}

/// Command line replacements for preset fields
#[derive(Debug, Default)]
struct Overrides {
    places: Option<u32>,
    group: Option<String>,
    point: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
}

impl Overrides {
    /// Preset with the overrides applied, checked like a config file preset
    fn apply(self, base: &FormatSettings) -> anyhow::Result<FormatSettings> {
        let mut settings = base.clone();
        if let Some(places) = self.places {
            settings.places = places;
        }
        if let Some(group) = self.group {
            settings.group = group;
        }
        if let Some(point) = self.point {
            settings.point = point;
        }
        if let Some(prefix) = self.prefix {
            settings.prefix = prefix;
        }
        if let Some(suffix) = self.suffix {
            settings.suffix = suffix;
        }
        if let Err(e) = settings.validate("format") {
            bail!("{}", e.to_details());
        }
        Ok(settings)
    }
}

fn parse_size(s: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = s
        .split_once('x')
        .with_context(|| format!("slide size {:?} is not WIDTHxHEIGHT", s))?;
    Ok((w.trim().parse()?, h.trim().parse()?))
}

/// Build a reader page with one gallery, wait for the slide show to start,
/// then replay the clicks and print the visible slide after each.
async fn replay_slideshow(
    config: &Config,
    sizes: &[(u32, u32)],
    clicks: &[String],
) -> anyhow::Result<()> {
    let gallery_id = config
        .slideshow
        .galleries
        .first()
        .cloned()
        .unwrap_or_else(|| "reader_page".to_string());

    let mut page = Page::new(1280);
    let root = page.append(page.root(), Element::new("div").id(&gallery_id));
    let container = page.append(root, Element::new("div").id("container"));
    for (n, (w, h)) in sizes.iter().enumerate() {
        let slide = page.append(
            container,
            Element::new("div").id(&format!("img-{}", n)).class("slide").hidden(),
        );
        page.append(slide, Element::image(*w, *h));
    }
    for n in 0..sizes.len() {
        page.append(root, Element::new("span").id(&format!("img-dot-{}", n)).class("nav-dot"));
    }

    let mut runtime = PageRuntime::new(page);
    install_page_widgets(&mut runtime, config);

    // Drive the virtual clock in real time until the start-up timers ran.
    while let Some(deadline) = runtime.next_deadline() {
        let wait = deadline.saturating_sub(runtime.now());
        tokio::time::sleep(Duration::from_millis(wait)).await;
        report_effects(runtime.run_until(deadline).effects);
    }
    println!("start: {}", describe(&runtime, root));

    for click in clicks {
        let target = if click == "next" {
            visible_slide(&runtime, root)
        } else {
            runtime.dom().element_by_id(root, &format!("img-dot-{}", click.trim()))
        };
        let Some(target) = target else {
            log::warn!("nothing to click for {:?}", click);
            continue;
        };
        report_effects(runtime.dispatch(Event::click(target)).effects);
        println!("{}: {}", click, describe(&runtime, root));
    }

    runtime.teardown();
    Ok(())
}

fn visible_slide(runtime: &PageRuntime<Page>, root: NodeId) -> Option<NodeId> {
    let dom = runtime.dom();
    dom.elements_by_class(root, "slide")
        .into_iter()
        .find(|s| dom.is_visible(*s))
}

fn describe(runtime: &PageRuntime<Page>, root: NodeId) -> String {
    let dom = runtime.dom();
    let Some(slide) = visible_slide(runtime, root) else {
        return "no slide visible".to_string();
    };
    let container = dom.element_by_id(root, "container");
    let style = |prop: &str| {
        container
            .and_then(|c| dom.style(c, prop))
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        "{} (container {} x {})",
        dom.id(slide).unwrap_or_default(),
        style("width"),
        style("height")
    )
}

fn report_effects(effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::OpenWindow(url) => println!("open window: {}", url),
            Effect::Alert(message) => println!("alert: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let overrides = Overrides {
            group: Some(",".to_string()),
            prefix: Some("$".to_string()),
            ..Overrides::default()
        };
        let settings = overrides.apply(&FormatSettings::default()).unwrap();
        assert_eq!(format_number("1234.5", &settings), "$1,234.50");
    }

    #[test]
    fn test_overrides_rejected() {
        let group_is_point = Overrides { group: Some(".".to_string()), ..Overrides::default() };
        assert!(group_is_point.apply(&FormatSettings::default()).is_err());

        let too_many_places = Overrides { places: Some(30), ..Overrides::default() };
        assert!(too_many_places.apply(&FormatSettings::default()).is_err());

        let empty_point = Overrides { point: Some(String::new()), ..Overrides::default() };
        assert!(empty_point.apply(&FormatSettings::default()).is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800x600").unwrap(), (800, 600));
        assert!(parse_size("800").is_err());
    }
}
