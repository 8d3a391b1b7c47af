use chrono::{DateTime, NaiveDate, Utc};
use colored::{ColoredString, Colorize};
use timeago::Formatter;
use toyverseapp::api::{CmdMessage, MessageLevel};
use toyverseapp::catalog::{CatalogStats, Category, Facets};
use toyverseapp::commands::{ToyDetail, UsageReport};
use toyverseapp::model::{parse_price, ToyRecord};
use toyverseapp::palette::TypeColors;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 32;
const BADGE_WIDTH: usize = 12;
const PRICE_WIDTH: usize = 10;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 8;
const NOT_SPECIFIED: &str = "Not specified";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_toy_list(
    toys: &[ToyRecord],
    colors: &mut TypeColors,
    currency: &str,
    active_filters: usize,
) {
    let now = Utc::now();
    for toy in toys {
        let id: String = toy.id.to_string().chars().take(ID_WIDTH).collect();
        let name = pad_to_width(&truncate_to_width(&toy.name, NAME_WIDTH), NAME_WIDTH);
        let type_label = toy.toy_type.as_deref().unwrap_or("-");
        let badge = badge(
            &pad_to_width(&truncate_to_width(type_label, BADGE_WIDTH), BADGE_WIDTH),
            colors.color_for(toy.toy_type.as_deref()),
        );
        let price = match toy.price.as_deref() {
            Some(raw) => format_currency(parse_price(Some(raw)), currency),
            None => String::new(),
        };
        let image_marker = if toy.has_images() { "▣" } else { " " };

        println!(
            "{}  {} {} {:>price_w$} {} {}",
            id.dimmed(),
            name,
            badge,
            price,
            image_marker,
            format_time_ago(toy.created_at, now).dimmed(),
            price_w = PRICE_WIDTH,
        );
    }

    let mut footer = format!("{} toy{}", toys.len(), if toys.len() == 1 { "" } else { "s" });
    if active_filters > 0 {
        footer.push_str(&format!(
            ", {} filter{} active",
            active_filters,
            if active_filters == 1 { "" } else { "s" }
        ));
    }
    println!("{}", footer.dimmed());
}

pub(super) fn print_stats(stats: &CatalogStats, currency: &str) {
    let rows = [
        ("Total toys", stats.total_toys.to_string()),
        ("Added this month", stats.monthly_toys.to_string()),
        ("Added this week", stats.recent_additions.to_string()),
        ("Collection value", format_currency(stats.total_value, currency)),
    ];
    for (label, value) in rows {
        println!("{:<18} {}", label.dimmed(), value.bold());
    }
}

pub(super) fn print_facets(facets: &Facets) {
    for category in Category::ALL {
        print_facet_line(category.name(), facets.values(category));
    }
    print_facet_line("tags", &facets.tags);
    print_facet_line("years", &facets.years);
    print_facet_line("months", &facets.months);
}

fn print_facet_line(name: &str, values: &[String]) {
    let shown = if values.is_empty() {
        "-".dimmed().to_string()
    } else {
        values.join(", ")
    };
    println!("{:<18} {}", name.dimmed(), shown);
}

pub(super) fn print_detail(detail: &ToyDetail, colors: &mut TypeColors, currency: &str) {
    let toy = &detail.toy;
    println!(
        "{} {}",
        toy.name.bold(),
        badge(
            toy.toy_type.as_deref().unwrap_or("-"),
            colors.color_for(toy.toy_type.as_deref())
        )
    );
    println!("{}", toy.id.to_string().dimmed());
    println!("--------------------------------");

    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let price = match toy.price.as_deref() {
        Some(raw) => format_currency(parse_price(Some(raw)), currency),
        None => NOT_SPECIFIED.to_string(),
    };
    let rows = [
        ("Series", text(&toy.series)),
        ("Brand", text(&toy.brand)),
        ("Code", text(&toy.code_number)),
        ("Quantity", toy.quantity.to_string()),
        ("Condition", text(&toy.condition)),
        ("Color variant", text(&toy.color_variant)),
        ("Purchased", format_long_date(toy.purchase_date)),
        ("Location", text(&toy.purchase_location)),
        ("Price", price),
        ("Added", format_long_date(Some(toy.created_at.date_naive()))),
    ];
    for (label, value) in rows {
        println!("{:<14} {}", label.dimmed(), value);
    }

    for (key, value) in &toy.custom_fields {
        println!("{:<14} {}", key.dimmed(), value);
    }

    if !detail.labels.is_empty() {
        println!("{:<14} {}", "Labels".dimmed(), detail.labels.join(", "));
    }

    if let Some(notes) = &toy.notes {
        println!();
        println!("{}", notes);
    }

    println!();
    if detail.gallery.is_empty() {
        println!("{}", "No images".dimmed());
    }
    for (i, url) in detail.gallery.iter().enumerate() {
        let marker = if i == 0 && toy.primary_image_url.is_some() {
            "primary".yellow()
        } else {
            format!("{:>7}", i + 1).dimmed()
        };
        println!("{} {}", marker, url);
    }
}

pub(super) fn print_usage(usage: &UsageReport) {
    let rows = [
        ("toys", usage.toys.to_string()),
        ("toy_images", usage.toy_images.to_string()),
        ("labels", usage.labels.to_string()),
        ("toy_labels", usage.toy_labels.to_string()),
        (
            "storage",
            format!(
                "{} object{}, {}",
                usage.storage.objects,
                if usage.storage.objects == 1 { "" } else { "s" },
                format_bytes(usage.storage.bytes)
            ),
        ),
    ];
    for (label, value) in rows {
        println!("{:<12} {}", label.dimmed(), value);
    }
}

pub(super) fn format_currency(value: f64, symbol: &str) -> String {
    format!("{}{:.2}", symbol, value)
}

/// "March 1, 2024", or "Not specified" when there is no date.
pub(super) fn format_long_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => NOT_SPECIFIED.to_string(),
    }
}

pub(super) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

/// Parses `#rrggbb`.
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn badge(text: &str, color: &str) -> ColoredString {
    match hex_to_rgb(color) {
        Some((r, g, b)) => text.truecolor(r, g, b).bold(),
        None => text.normal(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}
