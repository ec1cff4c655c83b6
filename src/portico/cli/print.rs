use chrono::{DateTime, Utc};
use colored::Colorize;
use portico::commands::{CmdMessage, MessageLevel, RowInfo, SiteSettings, StatusReport};
use portico::model::{MainCategory, Project};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 6;
const CATEGORY_WIDTH: usize = 24;
const YEAR_WIDTH: usize = 6;
const FEATURED_MARKER: &str = "★";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    for project in projects {
        println!("{}", project_line(project));
    }
}

fn project_line(project: &Project) -> String {
    let id = format!("{:>width$}. ", project.id, width = ID_WIDTH - 2);
    let marker = if project.featured {
        format!("{} ", FEATURED_MARKER)
    } else {
        "  ".to_string()
    };

    let fixed = id.width() + marker.width() + CATEGORY_WIDTH + YEAR_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let title = truncate_to_width(&project.title, available);
    let padding = available.saturating_sub(title.width());

    let category = truncate_to_width(project.main_category.as_str(), CATEGORY_WIDTH);
    let category = format!("{:<width$}", category, width = CATEGORY_WIDTH);
    let year = format!("{:>width$}", project.year, width = YEAR_WIDTH);

    let id_colored = if project.archived {
        id.red()
    } else {
        id.normal()
    };
    let title_colored = if project.archived {
        title.dimmed()
    } else {
        title.normal()
    };

    format!(
        "{}{}{}{}{}{}",
        id_colored,
        marker.yellow(),
        title_colored,
        " ".repeat(padding),
        category.dimmed(),
        year.dimmed()
    )
}

pub(super) fn print_project_detail(project: &Project, related: &[Project]) {
    println!(
        "{} {}",
        project.id.to_string().yellow(),
        project.title.bold()
    );
    println!("--------------------------------");
    println!("{}", project.main_category);
    if !project.sub_category.is_empty() {
        let subs: Vec<&str> = project.sub_category.iter().map(String::as_str).collect();
        println!("{}", subs.join(", ").dimmed());
    }

    let fields = [
        ("Year", &project.year),
        ("Location", &project.location),
        ("Architect", &project.architect),
        ("Client", &project.client),
        ("Area", &project.area),
        ("Status", &project.status),
        ("Image", &project.image_url),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            println!("{:<10} {}", format!("{}:", label).dimmed(), value);
        }
    }
    if !project.gallery_images.is_empty() {
        println!(
            "{:<10} {} image(s)",
            "Gallery:".dimmed(),
            project.gallery_images.len()
        );
    }

    let mut flags = Vec::new();
    if project.featured {
        flags.push("featured".yellow().to_string());
    }
    if project.archived {
        flags.push("archived".red().to_string());
    }
    if !flags.is_empty() {
        println!("{}", flags.join(" "));
    }

    if !project.description.is_empty() {
        println!();
        println!("{}", project.description);
    }

    if !related.is_empty() {
        println!("\nRelated:");
        for project in related {
            println!("{}", project_line(project));
        }
    }
}

pub(super) fn print_row_info(row: &RowInfo) {
    let more = if row.has_more { ", more available" } else { "" };
    println!(
        "{}",
        format!("Page {} of {} project(s){}", row.page, row.total_count, more).dimmed()
    );
}

pub(super) fn print_settings(settings: &SiteSettings) {
    println!("{:<10} {}", "Mode:".dimmed(), settings.display_mode);
    let links = &settings.social_links;
    let entries = [
        ("Instagram", &links.instagram),
        ("Twitter", &links.twitter),
        ("LinkedIn", &links.linkedin),
    ];
    for (label, value) in entries {
        let shown = value.as_deref().unwrap_or("-");
        println!("{:<10} {}", format!("{}:", label).dimmed(), shown);
    }
}

pub(super) fn print_status(status: &StatusReport) {
    let online = if status.online {
        "online".green()
    } else {
        "offline".red()
    };
    println!("{:<12} {}", "Remote:".dimmed(), online);
    println!(
        "{:<12} {}",
        "Projects:".dimmed(),
        count_or_unknown(status.stored_projects)
    );

    let featured = count_or_unknown(status.featured);
    let featured = match status.featured {
        Some(count) if count < status.featured_minimum => featured.yellow(),
        _ => featured.normal(),
    };
    println!(
        "{:<12} {} (minimum {})",
        "Featured:".dimmed(),
        featured,
        status.featured_minimum
    );

    let mirror = if status.mirror_seeded {
        format!("{} project(s)", status.mirrored_projects)
    } else {
        "not seeded".to_string()
    };
    println!("{:<12} {}", "Mirror:".dimmed(), mirror);

    let changed = status
        .last_change
        .as_ref()
        .map(|signal| format_time_ago(signal.at))
        .unwrap_or_else(|| "never".to_string());
    println!("{:<12} {}", "Changed:".dimmed(), changed);
    println!("{:<12} {}", "Mode:".dimmed(), status.display_mode);
}

pub(super) fn print_categories(categories: &[(MainCategory, &'static [&'static str])]) {
    for (i, (main, subs)) in categories.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", main.as_str().bold());
        for sub in subs.iter() {
            println!("  {}", sub);
        }
    }
}

fn count_or_unknown(count: Option<usize>) -> String {
    count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string())
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
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
