use crate::vfs::{VirtualFS, VirtualFolder};
use colored::Colorize;
use std::fmt::Write;

/// Renders each planned descriptor followed by its virtual folder tree.
///
/// Descriptor files and IDE files are green, virtual folders blue.
pub fn render_tree(vfs: &VirtualFS) -> String {
    let mut out = String::new();

    let len = vfs.entries.len();
    for (i, entry) in vfs.entries.iter().enumerate() {
        let is_last = i + 1 == len;

        let _ = writeln!(
            out,
            "{}{}",
            connector(is_last),
            entry.destination.display().to_string().green().bold()
        );

        let child_prefix = if is_last { "    " } else { "│   " };
        render_folder(&mut out, &entry.folders, child_prefix);
    }

    out
}

fn render_folder(out: &mut String, node: &VirtualFolder, prefix: &str) {
    let len = node.folders().len() + node.leaves().len();
    let mut index = 0;

    for folder in node.folders() {
        index += 1;
        let is_last = index == len;

        let _ = writeln!(
            out,
            "{}{}{}",
            prefix.yellow(),
            connector(is_last),
            folder.name().blue()
        );

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        render_folder(out, folder, &child_prefix);
    }

    for file in node.leaves() {
        index += 1;

        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());

        let _ = writeln!(
            out,
            "{}{}{}",
            prefix.yellow(),
            connector(index == len),
            name.green()
        );
    }
}

fn connector(is_last: bool) -> colored::ColoredString {
    if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    }
}

pub fn preview_as_tree(vfs: &VirtualFS) {
    println!(
        "Legend: {} = (virtual folder), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(vfs));

    println!("\n{}", "└─".bold().bright_blue());
}
