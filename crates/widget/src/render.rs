//! Text and JSON rendering of a refresh outcome
//!
//! All locale handling lives here. The refresh core only hands over the
//! sample, the live flag and the status.

use acquisition::RefreshOutcome;
use chrono::{DateTime, Duration, Local, Utc};
use clap::ValueEnum;
use pihole_api::Sample;
use serde::{Deserialize, Serialize};
use status_evaluator::{StatusLevel, StatusReason, StatusResult};
use std::fmt::Write;

/// Display language and number format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// German: `1.234`, `23,4 %`
    #[default]
    De,
    /// English: `1,234`, `23.4 %`
    En,
}

/// Size class of the rendered widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    Small,
    #[default]
    Medium,
    Large,
}

/// Immutable presentation settings
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub locale: Locale,
    /// Hours until the suggested next refresh
    pub refresh_hours: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            locale: Locale::De,
            refresh_hours: 6,
        }
    }
}

/// Suggested next refresh; saturates instead of overflowing
fn refresh_after(now: DateTime<Utc>, hours: u64) -> DateTime<Utc> {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Machine-readable view of one outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub sample: Sample,
    pub is_live: bool,
    pub status: StatusResult,
    pub source: &'static str,
    pub refresh_after: DateTime<Utc>,
    pub error: Option<String>,
}

impl WidgetView {
    pub fn new(outcome: &RefreshOutcome, config: &RenderConfig, now: DateTime<Utc>) -> Self {
        Self {
            sample: outcome.sample.clone(),
            is_live: outcome.is_live,
            status: outcome.status.clone(),
            source: outcome.source.as_str(),
            refresh_after: refresh_after(now, config.refresh_hours),
            error: outcome.failure.as_ref().map(ToString::to_string),
        }
    }
}

/// Integer with locale grouping
pub fn fmt_int(n: u64, locale: Locale) -> String {
    let sep = match locale {
        Locale::De => '.',
        Locale::En => ',',
    };
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Percentage with one decimal
pub fn fmt_pct(value: f64, locale: Locale) -> String {
    if !value.is_finite() {
        return "–".to_string();
    }
    let text = format!("{:.1}", value);
    match locale {
        Locale::De => format!("{} %", text.replace('.', ",")),
        Locale::En => format!("{} %", text),
    }
}

/// Relative age of a timestamp
pub fn age_text(fetched_at: Option<DateTime<Utc>>, now: DateTime<Utc>, locale: Locale) -> String {
    let Some(at) = fetched_at else {
        return match locale {
            Locale::De => "kein Zeitstempel".to_string(),
            Locale::En => "no timestamp".to_string(),
        };
    };

    let minutes = ((now - at).num_milliseconds() as f64 / 60_000.0).round();
    if minutes < 1.0 {
        return match locale {
            Locale::De => "gerade eben".to_string(),
            Locale::En => "just now".to_string(),
        };
    }
    if minutes < 60.0 {
        return match locale {
            Locale::De => format!("vor {} Min", minutes),
            Locale::En => format!("{} min ago", minutes),
        };
    }
    let hours = (minutes / 60.0).round();
    if hours < 48.0 {
        return match locale {
            Locale::De => format!("vor {} Std", hours),
            Locale::En => format!("{} h ago", hours),
        };
    }
    let days = (hours / 24.0).round();
    match locale {
        Locale::De => format!("vor {} Tg", days),
        Locale::En => format!("{} d ago", days),
    }
}

/// Wall clock time of the last update
pub fn format_time(fetched_at: Option<DateTime<Utc>>) -> String {
    match fetched_at {
        Some(at) => at.with_timezone(&Local).format("%H:%M").to_string(),
        None => "–".to_string(),
    }
}

/// Human-readable status line
pub fn status_text(status: &StatusResult, locale: Locale) -> String {
    let badge = match status.level {
        StatusLevel::Ok => "OK",
        StatusLevel::Warning => "WARN",
        StatusLevel::Error => "ERROR",
    };
    let message = match (&status.reason, locale) {
        (None, Locale::De) => "Alles in Ordnung".to_string(),
        (None, Locale::En) => "All good".to_string(),
        (Some(StatusReason::Offline), Locale::De) => "Pi-hole offline, keine aktuellen Daten".to_string(),
        (Some(StatusReason::Offline), Locale::En) => "Pi-hole offline, no current data".to_string(),
        (Some(StatusReason::StaleCache { age_minutes }), Locale::De) => {
            format!("Nicht erreichbar, Cache von vor {} Min", age_minutes)
        }
        (Some(StatusReason::StaleCache { age_minutes }), Locale::En) => {
            format!("Unreachable, cache is {} min old", age_minutes)
        }
        (Some(StatusReason::NoQueryActivity), Locale::De) => "Keine DNS-Anfragen".to_string(),
        (Some(StatusReason::NoQueryActivity), Locale::En) => "No DNS queries".to_string(),
        (Some(StatusReason::TooFewClients { clients }), Locale::De) => {
            format!("Nur {} Client(s) aktiv", clients)
        }
        (Some(StatusReason::TooFewClients { clients }), Locale::En) => {
            format!("Only {} client(s) active", clients)
        }
        (Some(StatusReason::LowQueryDelta { delta, window_minutes }), Locale::De) => {
            format!("Nur {} neue Anfragen in {} Min", delta, window_minutes)
        }
        (Some(StatusReason::LowQueryDelta { delta, window_minutes }), Locale::En) => {
            format!("Only {} new queries within {} min", delta, window_minutes)
        }
        (Some(StatusReason::ZeroBlockingRate), Locale::De) => "Es wird nichts blockiert".to_string(),
        (Some(StatusReason::ZeroBlockingRate), Locale::En) => "Nothing is being blocked".to_string(),
    };
    format!("[{}] {}", badge, message)
}

/// Render an outcome as terminal text
pub fn render_text(
    outcome: &RefreshOutcome,
    family: FormFactor,
    config: &RenderConfig,
    now: DateTime<Utc>,
) -> String {
    let locale = config.locale;
    let s = &outcome.sample;
    let badge = if outcome.is_live { "Live" } else { "Cache" };
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{:<24}{:>8}", "Pi-hole", badge);
    let as_of = match locale {
        Locale::De => "Stand",
        Locale::En => "As of",
    };
    let _ = writeln!(out, "{}: {}", as_of, age_text(s.fetched_at, now, locale));
    out.push('\n');

    let _ = writeln!(out, "{}", fmt_pct(s.percentage_blocked, locale));
    match family {
        FormFactor::Small => {
            let _ = writeln!(out, "Blocked: {}", fmt_int(s.queries_blocked, locale));
            let _ = writeln!(out, "Total: {}", fmt_int(s.total_queries, locale));
        }
        FormFactor::Medium => {
            pair(&mut out, ("Total queries", s.total_queries), ("Queries blocked", s.queries_blocked), locale);
            let _ = writeln!(out, "Domains on list: {}", fmt_int(s.domains_on_list, locale));
        }
        FormFactor::Large => {
            let _ = writeln!(out, "Blocking rate");
            out.push('\n');
            pair(&mut out, ("Total queries", s.total_queries), ("Queries blocked", s.queries_blocked), locale);
            pair(&mut out, ("Forwarded", s.forwarded), ("Cached", s.cached_count), locale);
            pair(&mut out, ("Clients", s.clients_total), ("Unique domains", s.unique_domains), locale);
            let _ = writeln!(out, "Domains on list: {}", fmt_int(s.domains_on_list, locale));
            let last_update = match locale {
                Locale::De => "letztes Update",
                Locale::En => "last update",
            };
            let _ = writeln!(
                out,
                "{} • {} {} • {}",
                badge,
                last_update,
                format_time(s.fetched_at),
                age_text(s.fetched_at, now, locale)
            );
        }
    }

    out.push('\n');
    let _ = writeln!(out, "{}", status_text(&outcome.status, locale));
    out
}

/// Two labelled values side by side
fn pair(out: &mut String, left: (&str, u64), right: (&str, u64), locale: Locale) {
    let _ = writeln!(out, "{:<20}{}", left.0, right.0);
    let _ = writeln!(
        out,
        "{:<20}{}",
        fmt_int(left.1, locale),
        fmt_int(right.1, locale)
    );
}
