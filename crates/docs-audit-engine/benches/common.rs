// Shared by the bench targets; each one only uses some of these.
#![allow(dead_code)]

const FRONT_MATTER: &str = "---\ntitle: Bench\nms.topic: overview\n---\n";

/// A front-matter document repeating a section that touches every block kind.
pub fn generate_markdown_content(size: usize) -> String {
    let section = "## Section\n\nParagraph with a [link](other.md).\n\n- Bullet point\n  - Nested item\n- Another item\n\n| Name | Value |\n|------|-------|\n| a    | 1     |\n\n```json\n{ \"type\": \"Microsoft.Storage/storageAccounts\" }\n```\n\n";
    format!("{FRONT_MATTER}# Title\n\n{}", section.repeat(size))
}

/// `articles` H1 articles, each with headings nested `depth` levels deep.
pub fn generate_article_tree(articles: usize, depth: usize) -> String {
    (0..articles)
        .map(|n| format!("# Article {n}\n\n{}\n", article_body(2, depth)))
        .collect()
}

fn article_body(level: usize, depth: usize) -> String {
    if depth == 0 || level > 6 {
        return String::new();
    }
    let indent = "  ".repeat((level - 2).min(3));
    let steps: String = (1..=3)
        .map(|step| format!("{indent}{step}. Step {step} at level {level}\n"))
        .collect();
    let note = if level % 3 == 0 {
        "> [!NOTE]\n> Remember to clean up resources.\n\n"
    } else {
        ""
    };
    format!(
        "{} Heading level {level}\n\nSee [the docs](https://learn.microsoft.com/azure/).\n\n{steps}\n{note}{}",
        "#".repeat(level),
        article_body(level + 1, depth - 1)
    )
}

pub fn generate_large_document() -> String {
    generate_article_tree(50, 4)
}
