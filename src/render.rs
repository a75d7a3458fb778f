// src/render.rs

//! HTML for the server-rendered pages.
//!
//! Every piece of stored or user-supplied text goes through
//! [`escape_text`] before it is written into markup.

use std::fmt::Write;

use crate::{
    models::{
        chapter::Chapter,
        exam::Exam,
        news::ExamNews,
        previous_year::PreviousYearPaper,
        subject::{Subject, SubjectPage},
        topic::{DescriptionNode, Table, Topic},
    },
    utils::html::escape_text,
};

/// Wraps a page body in the site layout.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | ExamPrep</title>\n</head>\n<body>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape_text(title),
        body
    )
}

/// An inline message scoped to the entity that failed to load.
pub fn message(title: &str, text: &str) -> String {
    layout(
        title,
        &format!("<p class=\"message\">{}</p>\n", escape_text(text)),
    )
}

pub fn exam_page(exam: &Exam, subjects: &SubjectPage) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_text(&exam.name));

    if let Some(description) = &exam.description {
        let _ = writeln!(body, "<p>{}</p>", escape_text(description));
    }
    if let Some(date) = &exam.upcoming_date {
        let _ = writeln!(body, "<p class=\"date\">Upcoming: {}</p>", escape_text(date));
    }

    body.push_str("<ul class=\"subjects\">\n");
    for subject in &subjects.subjects {
        let _ = writeln!(
            body,
            "<li><a href=\"/exam/{}/{}/chapters\">{}</a></li>",
            exam.id,
            subject.id,
            escape_text(&subject.name)
        );
    }
    body.push_str("</ul>\n");

    if subjects.subjects.is_empty() {
        body.push_str("<p class=\"message\">No subjects listed yet.</p>\n");
    }

    if subjects.has_prev() || subjects.has_next() {
        body.push_str("<nav class=\"pager\">\n");
        if subjects.has_prev() {
            let _ = writeln!(
                body,
                "<a rel=\"prev\" href=\"/exam/{}?page={}\">Previous</a>",
                exam.id,
                subjects.page - 1
            );
        }
        let _ = writeln!(body, "<span>Page {} of {}</span>", subjects.page, subjects.total_pages);
        if subjects.has_next() {
            let _ = writeln!(
                body,
                "<a rel=\"next\" href=\"/exam/{}?page={}\">Next</a>",
                exam.id,
                subjects.page + 1
            );
        }
        body.push_str("</nav>\n");
    }

    layout(&exam.name, &body)
}

pub fn chapters_page(exam: &Exam, subject: &Subject, chapters: &[Chapter]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{} &middot; {}</h1>",
        escape_text(&exam.name),
        escape_text(&subject.name)
    );

    if chapters.is_empty() {
        body.push_str("<p class=\"message\">No chapters found.</p>\n");
    }

    for chapter in chapters {
        body.push_str("<section class=\"chapter\">\n");
        let _ = writeln!(body, "<h2>{}</h2>", escape_text(&chapter.name));
        body.push_str("<ol>\n");
        for topic in &chapter.topics {
            match topic.slug() {
                Some(slug) => {
                    let _ = writeln!(
                        body,
                        "<li><a href=\"/topic/{}\">{}</a></li>",
                        escape_text(slug),
                        escape_text(topic.name())
                    );
                }
                None => {
                    let _ = writeln!(body, "<li>{}</li>", escape_text(topic.name()));
                }
            }
        }
        body.push_str("</ol>\n</section>\n");
    }

    layout(&format!("{} chapters", subject.name), &body)
}

pub fn previous_years_page(exam: &Exam, subject: &Subject, papers: &[PreviousYearPaper]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{} &middot; {} previous year questions</h1>",
        escape_text(&exam.name),
        escape_text(&subject.name)
    );

    if papers.is_empty() {
        body.push_str("<p class=\"message\">No previous year papers found.</p>\n");
    }

    for paper in papers {
        let _ = writeln!(body, "<section class=\"paper\">\n<h2>{}</h2>\n<ol>", paper.year);
        for question in &paper.questions {
            let _ = writeln!(body, "<li>\n<p>{}</p>", escape_text(&question.question));
            if !question.options.is_empty() {
                body.push_str("<ul class=\"options\">\n");
                for option in &question.options {
                    let _ = writeln!(body, "<li>{}</li>", escape_text(option));
                }
                body.push_str("</ul>\n");
            }
            let _ = writeln!(
                body,
                "<p class=\"answer\">Answer: {}</p>\n</li>",
                escape_text(&question.answer)
            );
        }
        body.push_str("</ol>\n</section>\n");
    }

    layout(&format!("{} previous years", subject.name), &body)
}

/// Subject overview with its chapter count and the other subject pages.
pub fn subject_info_page(exam: &Exam, subject: &Subject, chapters: &[Chapter]) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{} &middot; {}</h1>",
        escape_text(&exam.name),
        escape_text(&subject.name)
    );
    let _ = writeln!(body, "<p class=\"count\">Chapters: {}</p>", chapters.len());
    let _ = writeln!(
        body,
        "<ul class=\"actions\">\n<li><a href=\"/exam/{0}/{1}/chapters\">Chapters</a></li>\n\
         <li><a href=\"/exam/{0}/{1}/previous-year\">Previous Year Questions</a></li>\n</ul>",
        exam.id, subject.id
    );

    layout(&format!("{} info", subject.name), &body)
}

/// Headlines grouped by exam. Only http(s) links become anchors.
pub fn news_page(news: &[ExamNews]) -> String {
    let mut body = String::from("<h1>Exam News</h1>\n");

    if news.iter().all(|group| group.articles.is_empty()) {
        body.push_str("<p class=\"message\">No news available right now.</p>\n");
    }

    for group in news.iter().filter(|group| !group.articles.is_empty()) {
        body.push_str("<section class=\"news\">\n");
        let _ = writeln!(body, "<h2>{}</h2>", escape_text(&group.exam));
        body.push_str("<ul>\n");
        for article in &group.articles {
            let title = escape_text(&article.title);
            let linkable = url::Url::parse(&article.link)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if linkable {
                let _ = write!(
                    body,
                    "<li><a href=\"{}\" rel=\"noopener\">{}</a>",
                    escape_text(&article.link),
                    title
                );
            } else {
                let _ = write!(body, "<li>{}", title);
            }
            if let Some(date) = &article.date {
                let _ = write!(body, " <time>{}</time>", escape_text(date));
            }
            body.push_str("</li>\n");
        }
        body.push_str("</ul>\n</section>\n");
    }

    layout("Exam News", &body)
}

pub fn topic_page(topic: &Topic) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape_text(&topic.title));
    body.push_str("<div class=\"description\">\n");
    for node in &topic.description {
        render_node(&mut body, node, 0);
    }
    body.push_str("</div>\n");
    let _ = writeln!(body, "<p class=\"views\">Views: {}</p>", topic.views);

    layout(&topic.title, &body)
}

/// Renders one description node, recursing into details and properties.
fn render_node(out: &mut String, node: &DescriptionNode, depth: usize) {
    match node {
        DescriptionNode::Text(text) => {
            let _ = writeln!(
                out,
                "<p class=\"depth-{}\">{}</p>",
                depth,
                escape_text(text)
            );
        }
        DescriptionNode::Entry(entry) => {
            let _ = writeln!(out, "<div class=\"node depth-{}\">", depth);
            if let Some(point) = &entry.point {
                let _ = writeln!(out, "<h3>{}</h3>", escape_text(point));
            }
            if let Some(expression) = &entry.expression {
                let _ = writeln!(out, "<pre class=\"expression\">{}</pre>", escape_text(expression));
            }
            if let Some(example) = &entry.example {
                let _ = writeln!(out, "<p class=\"example\">Example: {}</p>", escape_text(example));
            }
            for table in &entry.tables {
                render_table(out, table);
            }
            for child in &entry.details {
                render_node(out, child, depth + 1);
            }
            for child in &entry.properties {
                render_node(out, child, depth + 1);
            }
            out.push_str("</div>\n");
        }
    }
}

fn render_table(out: &mut String, table: &Table) {
    out.push_str("<table>\n");
    if let Some(caption) = &table.caption {
        let _ = writeln!(out, "<caption>{}</caption>", escape_text(caption));
    }
    if !table.headers.is_empty() {
        out.push_str("<tr>");
        for header in &table.headers {
            let _ = write!(out, "<th>{}</th>", escape_text(header));
        }
        out.push_str("</tr>\n");
    }
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_text(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        chapter::TopicRef,
        id::ObjectId,
        news::Article,
        topic::DescriptionEntry,
    };

    fn jee() -> Exam {
        Exam {
            id: ObjectId::parse("000000000000000000000001").unwrap(),
            name: "JEE".into(),
            description: None,
            upcoming_date: None,
            subjects: vec![],
        }
    }

    #[test]
    fn exam_pager_links_only_existing_pages() {
        let mut subjects = SubjectPage {
            subjects: vec![],
            total: 25,
            page: 1,
            total_pages: 3,
        };
        let html = exam_page(&jee(), &subjects);
        assert!(!html.contains("rel=\"prev\""));
        assert!(html.contains("href=\"/exam/000000000000000000000001?page=2\">Next"));

        subjects.page = 3;
        let html = exam_page(&jee(), &subjects);
        assert!(html.contains("href=\"/exam/000000000000000000000001?page=2\">Previous"));
        assert!(!html.contains("rel=\"next\""));

        subjects.page = 1;
        subjects.total_pages = 1;
        assert!(!exam_page(&jee(), &subjects).contains("class=\"pager\""));
    }

    #[test]
    fn news_links_only_web_urls() {
        let news = vec![ExamNews {
            exam: "NEET".into(),
            articles: vec![
                Article {
                    title: "Admit card out".into(),
                    date: None,
                    link: "https://example.com/a".into(),
                },
                Article {
                    title: "Sneaky".into(),
                    date: None,
                    link: "javascript:alert(1)".into(),
                },
            ],
        }];

        let html = news_page(&news);
        assert!(html.contains(&format!("href=\"{}\"", escape_text("https://example.com/a"))));
        assert!(!html.contains("javascript"));
        assert!(html.contains(&format!("<li>{}</li>", escape_text("Sneaky"))));
    }

    #[test]
    fn message_escapes_the_token() {
        let html = message("Not found", "Exam \"<b>x</b>\" not found");
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn chapters_link_only_slugged_topics() {
        let exam = Exam {
            id: ObjectId::new(),
            name: "JEE".into(),
            description: None,
            upcoming_date: None,
            subjects: vec![],
        };
        let subject = Subject {
            id: ObjectId::new(),
            name: "Physics".into(),
            exam_ids: vec![exam.id],
        };
        let chapter = Chapter {
            id: ObjectId::new(),
            name: "Kinematics".into(),
            topics: vec![
                TopicRef::Name("Displacement".into()),
                TopicRef::Linked {
                    name: "Projectile".into(),
                    slug: "projectile-motion".into(),
                },
            ],
            subject_ids: vec![subject.id],
        };

        let html = chapters_page(&exam, &subject, &[chapter]);
        assert!(html.contains("<li>Displacement</li>"));
        assert!(html.contains("href=\"/topic/projectile-motion\""));
    }

    #[test]
    fn topic_tree_renders_nested_depths_in_order() {
        let topic = Topic {
            id: ObjectId::new(),
            slug: "ohms-law".into(),
            title: "Ohm".into(),
            exam: "JEE".into(),
            description: vec![
                DescriptionNode::Text("First".into()),
                DescriptionNode::Entry(DescriptionEntry {
                    point: Some("Law".into()),
                    expression: Some("V=IR".into()),
                    details: vec![DescriptionNode::Text("Nested".into())],
                    tables: vec![Table {
                        caption: None,
                        headers: vec!["V".into()],
                        rows: vec![vec!["1".into()]],
                    }],
                    ..Default::default()
                }),
            ],
            link: None,
            views: 3,
            created_at: None,
            updated_at: None,
        };

        let html = topic_page(&topic);
        let first = html.find("First").unwrap();
        let law = html.find("<h3>Law</h3>").unwrap();
        let nested = html.find("<p class=\"depth-1\">Nested</p>").unwrap();
        assert!(first < law && law < nested);
        assert!(html.contains("<th>V</th>"));
        assert!(html.contains("Views: 3"));
    }
}
