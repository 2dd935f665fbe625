use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, Timelike};

pub(super) fn resolve_chart_path(charts_dir: &Path, title: &str) -> PathBuf {
    charts_dir.join(chart_file_name(title))
}

fn chart_file_name(title: &str) -> String {
    let now = Local::now();
    let stamp = format!(
        "{:04}-{:02}-{:02}_{:02}-{:02}-{:02}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    );
    format!("chart-{}_{}.png", stamp, title_segment(title))
}

pub(super) fn title_segment(title: &str) -> String {
    let sanitized = sanitize_segment(&title.trim().to_ascii_lowercase());
    let collapsed = sanitized
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if collapsed.is_empty() {
        "untitled".to_owned()
    } else {
        collapsed
    }
}

fn sanitize_segment(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.' => ch,
            _ => '-',
        })
        .collect()
}
