use chrono::{DateTime, TimeZone};

use crate::{
    config::OutputConfig,
    merge::ChangeSet,
    model::{Paper, TIMESTAMP_FORMAT}
};

const NEW_MARKER: &str = " [New]";
const DIVIDER: &str = "<br>\n\n";

pub struct Formatter;

impl Formatter {
    pub fn to_header<Tz: TimeZone>(output: &OutputConfig, generated_at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display
    {
        format!(
            concat!(
                "\n# Visual Reasoning Papers on Arxiv\n\n",
                "This is a list of papers in the field of visual reasoning\n",
                "and is automatically generated by [{}]({}).\n\n\n",
                "<img src=\"{}\" width=\"480\" />\n\n\n",
                "Last update: {}\n\n",
                "___\n\n"
            ),
            generator_name(&output.generator_link),
            output.generator_link,
            output.chart_reference(),
            generated_at.format(TIMESTAMP_FORMAT)
        )
    }

    pub fn to_markdown(paper: &Paper, is_new: bool) -> String {
        let mut block = format!("## [{}](https://arxiv.org/pdf/{})", paper.title, paper.id);
        if is_new {
            block.push_str(NEW_MARKER);
        }
        block.push_str("\n\n");
        block.push_str(&format!("*{}*\n\n", paper.authors.join(", ")));
        block.push_str(&format!("**Abstract:** {}\n\n", paper.summary));
        if let Some(comment) = paper.comment.as_deref().filter(|c| !c.is_empty()) {
            block.push_str(&format!("**comment:** *{}*\n\n", comment));
        }
        if !paper.links.is_empty() {
            block.push_str(&format!("**links:** {}\n\n", paper.links.join(", ")));
        }
        block.push_str(&format!(
            "**published:** *{}*, **updated:** *{}*\n\n",
            paper.published, paper.updated
        ));
        block.push_str(DIVIDER);
        block
    }

    pub fn to_document<'a, Tz: TimeZone>(
        output: &OutputConfig,
        generated_at: &DateTime<Tz>,
        papers: impl IntoIterator<Item = &'a Paper>,
        changed: &ChangeSet
    ) -> String
    where
        Tz::Offset: std::fmt::Display
    {
        let mut document = Self::to_header(output, generated_at);
        for paper in papers {
            document.push_str(&Self::to_markdown(paper, changed.contains(&paper.id)));
        }
        document
    }
}

fn generator_name(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}
