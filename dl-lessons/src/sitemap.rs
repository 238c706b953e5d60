//! XML sitemap of static pages and daily lesson permutations

use chrono::{DateTime, SecondsFormat, Utc};
use dl_common::calendar;
use std::fmt::Write;

pub const STATIC_PAGES: [&str; 5] = ["", "/about", "/how-it-works", "/admin/monitor", "/advanced-lesson"];
pub const SITEMAP_AGES: [u32; 9] = [8, 12, 16, 25, 35, 45, 55, 65, 75];
pub const SITEMAP_TONES: [&str; 3] = ["fun", "grandmother", "neutral"];

/// Daily pages listed per year (leap days are not listed)
pub const SITEMAP_DAYS: usize = 365;

/// Relative paths of every page, in sitemap order
pub fn page_paths(year: i32) -> Vec<String> {
    let mut paths: Vec<String> = STATIC_PAGES.iter().map(|p| p.to_string()).collect();

    for day in calendar::all_days(year).into_iter().take(SITEMAP_DAYS) {
        let base = format!("/daily-lesson/{}", day.formatted_date);
        paths.push(base.clone());
        for age in SITEMAP_AGES {
            for tone in SITEMAP_TONES {
                paths.push(format!("{}?age={}&tone={}", base, age, tone));
            }
        }
    }

    paths
}

fn priority(path: &str) -> &'static str {
    if path.is_empty() {
        "1.0"
    } else if path.starts_with("/daily-lesson/") {
        "0.9"
    } else {
        "0.8"
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render the sitemap document
pub fn build(base_url: &str, year: i32, lastmod: DateTime<Utc>) -> String {
    let base_url = base_url.trim_end_matches('/');
    let lastmod = lastmod.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in page_paths(year) {
        // Writing into a String cannot fail
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>daily</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            escape_xml(&format!("{}{}", base_url, path)),
            lastmod,
            priority(&path)
        );
    }
    xml.push_str("</urlset>\n");
    xml
}
