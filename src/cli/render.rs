use crate::views::{DropdownItem, MenuAction, MenuBarMenu, MenuItem, SessionForm, SessionList};
use std::fmt::{self, Write};

/// Run a writer against a fresh buffer. Writing into a `String` cannot fail.
fn to_text(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    if let Err(e) = write(&mut out) {
        tracing::warn!(error = %e, "failed to render output");
    }
    out
}

fn write_dropdown(
    out: &mut String,
    label: &str,
    items: &[DropdownItem],
    selected: Option<&str>,
) -> fmt::Result {
    writeln!(out, "{}:", label)?;
    if items.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for item in items {
        let marker = if Some(item.value.as_str()) == selected {
            '*'
        } else {
            ' '
        };
        writeln!(out, "  {} {}  [{}]", marker, item.title, item.value)?;
    }
    Ok(())
}

fn write_session_list(out: &mut String, list: &SessionList) -> fmt::Result {
    if list.is_loading {
        writeln!(out, "Loading...")?;
    }
    write_dropdown(
        out,
        "Source",
        &list.source_dropdown,
        list.selected_source.as_deref(),
    )?;
    writeln!(out)?;

    if list.items.is_empty() {
        writeln!(out, "No sessions")?;
    }
    for item in &list.items {
        writeln!(out, "{}  {}  ({})", item.title, item.subtitle, item.accessory)?;
    }
    Ok(())
}

fn write_session_form(out: &mut String, form: &SessionForm) -> fmt::Result {
    write_dropdown(
        out,
        "Source",
        &form.source_dropdown,
        form.selected_source.as_deref(),
    )?;
    write_dropdown(
        out,
        "Branch",
        &form.branch_dropdown,
        form.default_branch.as_deref(),
    )?;
    writeln!(out, "Message: {}", form.message_placeholder)
}

fn write_recent_item(out: &mut String, index: usize, item: &MenuItem) -> fmt::Result {
    match item.icon {
        Some(icon) => writeln!(
            out,
            "  [{}] {} {}  {}",
            index,
            icon.glyph(),
            item.title,
            item.subtitle.as_deref().unwrap_or_default()
        ),
        None => writeln!(out, "  {}", item.title),
    }
}

fn write_menu(out: &mut String, menu: &MenuBarMenu) -> fmt::Result {
    write!(out, "{}", menu.tooltip)?;
    if menu.is_loading {
        write!(out, " (loading)")?;
    }
    writeln!(out)?;

    if let Some(title) = menu.recent.title {
        writeln!(out, "{}", title)?;
    }
    for (index, item) in menu.recent.items.iter().enumerate() {
        write_recent_item(out, index, item)?;
    }

    writeln!(out, "---")?;
    for item in &menu.actions.items {
        match &item.action {
            MenuAction::Launch(command) => writeln!(out, "  {}  ({})", item.title, command)?,
            _ => writeln!(out, "  {}", item.title)?,
        }
    }
    Ok(())
}

pub fn render_session_list(list: &SessionList) -> String {
    to_text(|out| write_session_list(out, list))
}

pub fn render_session_form(form: &SessionForm) -> String {
    to_text(|out| write_session_form(out, form))
}

pub fn render_menu(menu: &MenuBarMenu) -> String {
    to_text(|out| write_menu(out, menu))
}
