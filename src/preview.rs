use crate::{
    manifest::Manifest,
    tree::{Children, Node},
};
use colored::Colorize;

/// Renders the children of a folder, one line per node, with box-drawing connectors.
fn render_children(children: &Children, prefix: &str, lines: &mut Vec<String>) {
    let len = children.len();

    for (i, (name, node)) in children.iter().enumerate() {
        let is_last = i == len - 1;

        let connector = if is_last {
            "└── ".yellow()
        } else {
            "├── ".yellow()
        };
        let label = if node.is_file() {
            name.green()
        } else {
            name.blue()
        };
        let flag = if node.inject_project_info() {
            " *".yellow().to_string()
        } else {
            String::new()
        };

        lines.push(format!("{}{}{}{}", prefix.yellow(), connector, label, flag));

        if let Node::Folder { children, .. } = node {
            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };

            render_children(children, &child_prefix, lines);
        }
    }
}

/// Renders `manifest` as a tree rooted at `template`, one string per line.
pub fn render_tree(template: &str, manifest: &Manifest) -> Vec<String> {
    let mut lines = vec![template.bold().to_string()];

    if manifest.is_empty() {
        lines.push("(empty template)".dimmed().to_string());
    }

    render_children(&manifest.0, "", &mut lines);

    lines
}

pub fn preview_as_tree(template: &str, manifest: &Manifest) {
    println!(
        "Legend: {} = (directory), {} = (file), {} = (needs injection)",
        "blue".blue(),
        "green".green(),
        "*".yellow()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Manifest".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    for line in render_tree(template, manifest) {
        println!("{}", line);
    }

    let (folders, files) = manifest.count();

    println!(
        "\n{} {} folders, {} files",
        "└─".bold().bright_blue(),
        folders,
        files
    );
}
