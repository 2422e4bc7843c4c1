//! Text output formatting with optional colors.

use chrono::{DateTime, FixedOffset};
use gleaner_config::Config;
use gleaner_core::{
    DocbasePost, GitHubComment, GitHubIssue, QiitaItem, ServiceKind, SlackMessage,
    SlackSearchPage, SlackThread, SlackUser, ZennArticle,
};
use gleaner_providers::{CollectionFailure, ThreadCollection};
use std::collections::BTreeMap;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Longest excerpt shown for a message or body.
const EXCERPT_CHARS: usize = 120;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    excerpt_chars: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            excerpt_chars: EXCERPT_CHARS,
        }
    }

    // ========================================================================
    // Docbase
    // ========================================================================

    /// Formats a list of Docbase posts.
    pub fn format_posts(&self, posts: &[DocbasePost]) -> String {
        let mut lines = Vec::new();
        for post in posts {
            let mut header = format!("{} {}", self.dim(&format!("#{}", post.id)), self.bold(&post.title));
            if post.draft {
                header.push_str(&format!(" {}", self.yellow("[draft]")));
            }
            lines.push(header);

            let mut meta = Vec::new();
            if let Some(author) = post.author_name() {
                meta.push(author.to_string());
            }
            if let Some(created) = &post.created_at {
                meta.push(format_date(created));
            }
            let tags = post.tag_names();
            if !tags.is_empty() {
                meta.push(tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "));
            }
            if !meta.is_empty() {
                lines.push(format!("  {}", self.dim(&meta.join(" · "))));
            }
            if !post.url.is_empty() {
                lines.push(format!("  {}", self.cyan(&post.url)));
            }
        }
        lines.push(self.total_line(posts.len(), "post"));
        lines.join("\n")
    }

    // ========================================================================
    // Slack
    // ========================================================================

    /// Formats one page of Slack search results.
    pub fn format_search_page(&self, page: &SlackSearchPage) -> String {
        let mut lines = Vec::new();
        for hit in &page.matches {
            let channel = hit.channel.name.as_deref().unwrap_or(&hit.channel.id);
            let author = hit.username.as_deref().or(hit.user.as_deref()).unwrap_or("?");
            lines.push(format!(
                "{} {} {}",
                self.cyan(&format!("#{channel}")),
                self.bold(author),
                self.excerpt(&hit.text)
            ));
            if let Some(link) = &hit.permalink {
                lines.push(format!("  {}", self.dim(link)));
            }
        }
        lines.push(self.dim(&format!(
            "Page {}/{} · {} matches",
            page.page, page.page_count, page.total
        )));
        lines.join("\n")
    }

    /// Formats one thread. Authors are shown by name when resolved.
    pub fn format_thread(&self, thread: &SlackThread, users: &BTreeMap<String, SlackUser>) -> String {
        let mut lines = Vec::new();
        let channel = thread.channel.name.as_deref().unwrap_or(&thread.channel.id);
        lines.push(format!(
            "{} {}",
            self.cyan(&format!("#{channel}")),
            self.dim(&thread.thread_ts)
        ));
        if let Some(link) = &thread.permalink {
            lines.push(format!("  {}", self.dim(link)));
        }

        for (i, message) in thread.messages.iter().enumerate() {
            let indent = if i == 0 { "  " } else { "    ↳ " };
            lines.push(format!(
                "{indent}{} {}",
                self.bold(&self.author(message, users)),
                self.excerpt(&message.text)
            ));
        }
        lines.join("\n")
    }

    /// Formats a thread collection with its partial failures.
    pub fn format_collection(&self, collection: &ThreadCollection) -> String {
        let mut blocks: Vec<String> = collection
            .threads
            .iter()
            .map(|thread| self.format_thread(thread, &collection.users))
            .collect();

        blocks.push(self.dim(&format!(
            "{} threads from {} matches · {} users",
            collection.threads.len(),
            collection.matched,
            collection.users.len()
        )));

        if !collection.failures.is_empty() {
            let failures: Vec<String> = collection
                .failures
                .iter()
                .map(|f| self.format_failure(f))
                .collect();
            blocks.push(failures.join("\n"));
        }

        blocks.join("\n\n")
    }

    /// Formats one partial failure as a warning line.
    pub fn format_failure(&self, failure: &CollectionFailure) -> String {
        self.yellow(&format!(
            "warning: {} {} failed: {}",
            failure.stage, failure.target, failure.error
        ))
    }

    fn author(&self, message: &SlackMessage, users: &BTreeMap<String, SlackUser>) -> String {
        match (&message.user, &message.bot_id) {
            (Some(id), _) => users
                .get(id)
                .map_or_else(|| id.clone(), |u| u.preferred_name().to_string()),
            (None, Some(bot)) => format!("bot:{bot}"),
            (None, None) => "?".to_string(),
        }
    }

    // ========================================================================
    // GitHub
    // ========================================================================

    /// Formats a list of GitHub issues.
    pub fn format_issues(&self, issues: &[GitHubIssue]) -> String {
        let mut lines = Vec::new();
        for issue in issues {
            let kind = if issue.is_pull_request() { "PR" } else { "issue" };
            let repo = issue.repository().unwrap_or_default();
            let state = if issue.state == "open" {
                self.green(&issue.state)
            } else {
                self.dim(&issue.state)
            };
            lines.push(format!(
                "{} {} {} {}",
                self.dim(&format!("{repo}#{}", issue.number)),
                state,
                self.dim(kind),
                self.bold(&issue.title)
            ));
            if !issue.html_url.is_empty() {
                lines.push(format!("  {}", self.cyan(&issue.html_url)));
            }
        }
        lines.push(self.total_line(issues.len(), "issue"));
        lines.join("\n")
    }

    /// Formats issue comments.
    pub fn format_comments(&self, comments: &[GitHubComment]) -> String {
        let mut lines = Vec::new();
        for comment in comments {
            let author = comment.user.as_ref().map_or("?", |u| u.login.as_str());
            let date = comment.created_at.as_ref().map(format_date).unwrap_or_default();
            lines.push(format!("{} {}", self.bold(author), self.dim(&date)));
            lines.push(format!("  {}", self.excerpt(&comment.body)));
        }
        lines.push(self.total_line(comments.len(), "comment"));
        lines.join("\n")
    }

    // ========================================================================
    // Qiita / Zenn
    // ========================================================================

    /// Formats Qiita items.
    pub fn format_qiita_items(&self, items: &[QiitaItem]) -> String {
        let mut lines = Vec::new();
        for item in items {
            let author = item.user.as_ref().map_or("?", |u| u.id.as_str());
            lines.push(format!(
                "{} {} {}",
                self.bold(&item.title),
                self.dim(&format!("@{author}")),
                self.dim(&format!("♥ {}", item.likes_count))
            ));
            if !item.url.is_empty() {
                lines.push(format!("  {}", self.cyan(&item.url)));
            }
        }
        lines.push(self.total_line(items.len(), "item"));
        lines.join("\n")
    }

    /// Formats Zenn articles.
    pub fn format_zenn_articles(&self, articles: &[ZennArticle]) -> String {
        let mut lines = Vec::new();
        for article in articles {
            let emoji = article.emoji.as_deref().unwrap_or(" ");
            let date = article.published_at.as_ref().map(format_date).unwrap_or_default();
            lines.push(format!("{emoji} {} {}", self.bold(&article.title), self.dim(&date)));
            lines.push(format!("  {}", self.cyan(&article.url())));
        }
        lines.push(self.total_line(articles.len(), "article"));
        lines.join("\n")
    }

    /// Formats a single Zenn article header and body size.
    pub fn format_zenn_article(&self, article: &ZennArticle) -> String {
        let mut lines = vec![
            self.bold(&article.title),
            self.cyan(&article.url()),
        ];
        if let Some(body) = &article.body_html {
            lines.push(self.dim(&format!("{} bytes of HTML", body.len())));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Formats the supported service table.
    pub fn format_services(&self, config: &Config) -> String {
        let mut lines = vec![
            format!(
                "{:<10} {:<22} {:<16} {}",
                "Service", "Host", "Token env", "Token"
            ),
            "─".repeat(60),
        ];

        for kind in ServiceKind::all() {
            let env = config.token_env(*kind).unwrap_or("-");
            let status = match (kind.requires_token(), config.optional_token(*kind).is_some()) {
                (_, true) => self.green("set"),
                (true, false) => self.yellow("missing"),
                (false, false) => self.dim("optional"),
            };
            lines.push(format!(
                "{:<10} {:<22} {:<16} {}",
                kind.cli_name(),
                kind.api_host(),
                env,
                status
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn total_line(&self, count: usize, noun: &str) -> String {
        let plural = if count == 1 { "" } else { "s" };
        self.dim(&format!("{count} {noun}{plural}"))
    }

    /// Collapses whitespace and truncates to the excerpt length.
    pub fn excerpt(&self, text: &str) -> String {
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= self.excerpt_chars {
            return flat;
        }
        let cut: String = flat.chars().take(self.excerpt_chars).collect();
        format!("{cut}…")
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%d").to_string()
}
