//! Leaf renderers for each section type.
//!
//! Every leaf reads colours and fonts through the `var(--resume-*)` tokens and
//! marks itself with the `highlight-flash` class while its highlight key is live.
//! The keys actually shown are collected so the caller can observe them.

use chrono::NaiveDate;

use crate::highlight::{HighlightTarget, Highlights};
use crate::layout::resolver::{ResolvedSection, SectionContent};
use crate::models::resume::{CustomSection, CustomSectionItem, Education, Experience, PersonalInfo};
use crate::models::style::{Alignment, Spacing};
use crate::render::tokens::{
    justify, rem, text_align, Tokens, VAR_BACKGROUND, VAR_FONT_BODY, VAR_FONT_HEADING,
    VAR_PRIMARY, VAR_SECONDARY, VAR_TEXT,
};
use crate::render::vnode::VNode;

pub const HIGHLIGHT_CLASS: &str = "highlight-flash";
const NAME_PLACEHOLDER: &str = "Your Name";

fn styled<K: Into<String>>(node: VNode, styles: impl IntoIterator<Item = (K, String)>) -> VNode {
    styles
        .into_iter()
        .fold(node, |node, (key, value)| node.with_style(key, value))
}

/// `YYYY-MM-DD` and `YYYY-MM` become `Mon YYYY`; anything else is kept as typed.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}

fn experience_dates(exp: &Experience) -> String {
    let end = if exp.current {
        "Present".to_string()
    } else {
        format_date(&exp.end_date)
    };
    format!("{} - {end}", format_date(&exp.start_date))
}

fn education_dates(edu: &Education) -> String {
    match (edu.start_date.is_empty(), edu.end_date.is_empty()) {
        (false, false) => format!(
            "{} - {}",
            format_date(&edu.start_date),
            format_date(&edu.end_date)
        ),
        _ => format_date(&edu.end_date),
    }
}

pub struct SectionRenderer<'a> {
    tokens: &'a Tokens<'a>,
    highlights: &'a Highlights,
    highlighted: Vec<String>,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(tokens: &'a Tokens<'a>, highlights: &'a Highlights) -> Self {
        Self {
            tokens,
            highlights,
            highlighted: Vec::new(),
        }
    }

    /// Keys that rendered with emphasis, in document order.
    pub fn into_highlighted(self) -> Vec<String> {
        self.highlighted
    }

    pub fn flash(&mut self, node: VNode, target: &HighlightTarget) -> VNode {
        let key = target.key();
        if !self.highlights.is_highlighted(&key) {
            return node;
        }
        if !self.highlighted.contains(&key) {
            self.highlighted.push(key);
        }
        node.with_class(HIGHLIGHT_CLASS)
    }

    fn text(&self, tag: &str, content: &str) -> VNode {
        styled(VNode::element(tag), self.tokens.body_text()).with_child(VNode::text(content))
    }

    fn muted(&self, content: &str) -> VNode {
        VNode::element("span")
            .with_style("font-size", rem(self.tokens.scale.body_size))
            .with_style("color", VAR_SECONDARY)
            .with_style("white-space", "nowrap")
            .with_child(VNode::text(content))
    }

    fn entry_heading(&self, content: &str, color: &str) -> VNode {
        VNode::element("h3")
            .with_style("font-size", rem(self.tokens.scale.body_size * 1.25))
            .with_style("font-weight", "600")
            .with_style("margin", "0")
            .with_style("font-family", VAR_FONT_HEADING)
            .with_style("color", color.to_string())
            .with_child(VNode::text(content))
    }

    fn bullet_list(&self, items: &[String]) -> VNode {
        let list = VNode::element("ul")
            .with_style("list-style", "disc inside")
            .with_style("margin", "0.5rem 0 0 0")
            .with_style("padding", "0");
        list.with_children(items.iter().map(|item| self.text("li", item)))
    }

    fn title(&self, content: &str) -> VNode {
        styled(VNode::element("h2"), self.tokens.section_title()).with_child(VNode::text(content))
    }

    /// Wraps rendered section content with the section frame every type shares.
    fn frame(&self, id: &str, children: Vec<VNode>) -> VNode {
        styled(
            VNode::element("section")
                .with_attr("class", "resume-section")
                .with_attr("data-section-id", id),
            self.tokens.section(),
        )
        .with_children(children)
    }

    fn titled(&self, id: &str, title: &str, body: VNode) -> VNode {
        self.frame(id, vec![self.title(title), body])
    }

    pub fn section(&mut self, section: &ResolvedSection<'_>) -> VNode {
        match &section.content {
            SectionContent::Header {
                personal_info,
                profile_image,
                header_alignment,
                summary_alignment,
            } => {
                let header = self.header(
                    personal_info,
                    *profile_image,
                    *header_alignment,
                    *summary_alignment,
                );
                self.frame(section.id, vec![header])
            }
            SectionContent::Experience(entries) => {
                let body = self.experience_list(entries);
                self.titled(section.id, "Experience", body)
            }
            SectionContent::Education(entries) => {
                let body = self.education_list(entries);
                self.titled(section.id, "Education", body)
            }
            SectionContent::Skills(skills) => {
                let body = self.skills(skills);
                self.titled(section.id, "Skills", body)
            }
            SectionContent::Custom(custom) => {
                let body = self.custom(custom);
                let node = self.titled(section.id, &custom.title, body);
                self.flash(
                    node,
                    &HighlightTarget::Custom {
                        section_id: custom.id.clone(),
                        item_id: None,
                    },
                )
            }
        }
    }

    // ── header ─────────────────────────────────────────────────────────────

    fn header(
        &mut self,
        info: &PersonalInfo,
        profile_image: Option<&str>,
        alignment: Alignment,
        summary_alignment: Alignment,
    ) -> VNode {
        let name = if info.name.is_empty() {
            NAME_PLACEHOLDER
        } else {
            info.name.as_str()
        };

        let compact = self.tokens.styling.spacing == Spacing::Compact;
        let heading = VNode::element("h1")
            .with_style("font-size", if compact { "1.5rem" } else { "2rem" })
            .with_style("font-weight", "700")
            .with_style("margin", "0 0 0.5rem 0")
            .with_style("font-family", VAR_FONT_HEADING)
            .with_style("color", VAR_PRIMARY)
            .with_child(VNode::text(name));

        let mut contact = VNode::element("div")
            .with_attr("class", "resume-contact")
            .with_style("display", "flex")
            .with_style("flex-wrap", "wrap")
            .with_style("gap", "0.75rem")
            .with_style("justify-content", justify(alignment))
            .with_style("font-size", rem(self.tokens.scale.body_size))
            .with_style("color", VAR_SECONDARY);
        if !info.email.is_empty() {
            contact = contact.with_child(
                VNode::element("a")
                    .with_attr("href", format!("mailto:{}", info.email))
                    .with_child(VNode::text(&info.email)),
            );
        }
        for value in [&info.phone, &info.location] {
            if !value.is_empty() {
                contact = contact.with_child(VNode::element("span").with_child(VNode::text(value)));
            }
        }

        let mut text = VNode::element("div")
            .with_style("flex", "1")
            .with_style("text-align", text_align(alignment))
            .with_child(heading)
            .with_child(contact);
        if let Some(summary) = info.summary.as_deref().filter(|s| !s.is_empty()) {
            text = text.with_child(
                self.text("p", summary)
                    .with_style("margin-top", "0.75rem")
                    .with_style("text-align", text_align(summary_alignment)),
            );
        }

        let mut row = VNode::element("div").with_style("display", "flex");
        row = match alignment {
            Alignment::Left => row.with_style("align-items", "flex-start").with_style("gap", "1.5rem"),
            Alignment::Center => row
                .with_style("flex-direction", "column")
                .with_style("align-items", "center")
                .with_style("gap", "1rem"),
            Alignment::Right => row
                .with_style("flex-direction", "row-reverse")
                .with_style("align-items", "flex-start")
                .with_style("gap", "1.5rem"),
        };
        if let Some(src) = profile_image {
            let image_size = if compact { "4rem" } else { "6rem" };
            let image = VNode::element("img")
                .with_attr("class", "resume-profile-image")
                .with_attr("src", src)
                .with_attr("alt", name)
                .with_style("width", image_size)
                .with_style("height", image_size)
                .with_style("border-radius", "9999px")
                .with_style("object-fit", "cover")
                .with_style("border", format!("4px solid {VAR_PRIMARY}"));
            row = row.with_child(self.flash(image, &HighlightTarget::ProfileImage));
        }
        row = row.with_child(text);

        let header = VNode::element("header")
            .with_attr("class", "resume-header")
            .with_child(row);
        self.flash(header, &HighlightTarget::Header)
    }

    // ── experience / education ─────────────────────────────────────────────

    fn experience_list(&mut self, entries: &[Experience]) -> VNode {
        let items: Vec<VNode> = entries.iter().map(|exp| self.experience(exp)).collect();
        styled(VNode::element("div"), self.tokens.stack(self.tokens.scale.item_gap)).with_children(items)
    }

    fn experience(&mut self, exp: &Experience) -> VNode {
        let mut employer = exp.company.clone();
        if let Some(location) = exp.location.as_deref().filter(|l| !l.is_empty()) {
            employer.push_str(" • ");
            employer.push_str(location);
        }

        let summary = VNode::element("div")
            .with_child(self.entry_heading(&exp.role, VAR_PRIMARY))
            .with_child(self.text("p", &employer).with_style("margin", "0"));
        let top = VNode::element("div")
            .with_style("display", "flex")
            .with_style("justify-content", "space-between")
            .with_style("align-items", "flex-start")
            .with_child(summary)
            .with_child(self.muted(&experience_dates(exp)));

        let mut entry = VNode::element("article")
            .with_attr("class", "resume-entry")
            .with_attr("data-entry-id", &exp.id)
            .with_child(top);
        if !exp.achievements.is_empty() {
            entry = entry.with_child(self.bullet_list(&exp.achievements));
        }
        self.flash(
            entry,
            &HighlightTarget::Experience {
                id: Some(exp.id.clone()),
            },
        )
    }

    fn education_list(&mut self, entries: &[Education]) -> VNode {
        let items: Vec<VNode> = entries.iter().map(|edu| self.education(edu)).collect();
        styled(VNode::element("div"), self.tokens.stack(self.tokens.scale.item_gap)).with_children(items)
    }

    fn education(&mut self, edu: &Education) -> VNode {
        let degree = if edu.field.is_empty() {
            edu.degree.clone()
        } else {
            format!("{} in {}", edu.degree, edu.field)
        };

        let mut summary = VNode::element("div")
            .with_child(self.entry_heading(&edu.school, VAR_PRIMARY))
            .with_child(self.text("p", &degree).with_style("margin", "0"));
        if let Some(location) = edu.location.as_deref().filter(|l| !l.is_empty()) {
            summary = summary.with_child(self.muted(location));
        }

        let mut top = VNode::element("div")
            .with_style("display", "flex")
            .with_style("justify-content", "space-between")
            .with_style("align-items", "flex-start")
            .with_child(summary);
        let dates = education_dates(edu);
        if !dates.is_empty() {
            top = top.with_child(self.muted(&dates));
        }

        let mut entry = VNode::element("article")
            .with_attr("class", "resume-entry")
            .with_attr("data-entry-id", &edu.id)
            .with_child(top);
        if let Some(gpa) = edu.gpa.as_deref().filter(|g| !g.is_empty()) {
            entry = entry.with_child(
                self.text("p", &format!("GPA: {gpa}"))
                    .with_style("margin", "0.25rem 0 0 0"),
            );
        }
        self.flash(
            entry,
            &HighlightTarget::Education {
                id: Some(edu.id.clone()),
            },
        )
    }

    // ── skills ─────────────────────────────────────────────────────────────

    fn skills(&mut self, skills: &[String]) -> VNode {
        let body = if self.tokens.scale.inline_skills {
            self.text("p", &skills.join(" • ")).with_style("margin", "0")
        } else {
            let chips = skills.iter().map(|skill| {
                VNode::element("span")
                    .with_attr("class", "resume-skill")
                    .with_style("padding", "0.25rem 0.75rem")
                    .with_style("border-radius", "9999px")
                    .with_style("font-size", rem(self.tokens.scale.body_size))
                    .with_style("font-weight", "500")
                    .with_style("background-color", VAR_PRIMARY)
                    .with_style("color", VAR_BACKGROUND)
                    .with_style("font-family", VAR_FONT_BODY)
                    .with_child(VNode::text(skill))
            });
            VNode::element("div")
                .with_style("display", "flex")
                .with_style("flex-wrap", "wrap")
                .with_style("gap", "0.5rem")
                .with_children(chips.collect::<Vec<_>>())
        };
        let wrapper = VNode::element("div")
            .with_attr("class", "resume-skills")
            .with_child(body);
        self.flash(wrapper, &HighlightTarget::Skills)
    }

    // ── custom sections ────────────────────────────────────────────────────

    fn custom(&mut self, section: &CustomSection) -> VNode {
        let items: Vec<VNode> = section
            .items
            .iter()
            .map(|item| self.custom_item(&section.id, item))
            .collect();
        styled(VNode::element("div"), self.tokens.stack(self.tokens.scale.item_gap)).with_children(items)
    }

    fn custom_item(&mut self, section_id: &str, item: &CustomSectionItem) -> VNode {
        let mut top = VNode::element("div")
            .with_style("display", "flex")
            .with_style("justify-content", "space-between")
            .with_style("align-items", "baseline");
        if let Some(title) = &item.title {
            top = top.with_child(self.entry_heading(title, VAR_TEXT));
        }
        if let Some(date) = &item.date {
            top = top.with_child(self.muted(date));
        }

        let mut entry = VNode::element("article")
            .with_attr("class", "resume-entry")
            .with_attr("data-entry-id", &item.id)
            .with_child(top);
        if let Some(subtitle) = &item.subtitle {
            entry = entry.with_child(
                VNode::element("p")
                    .with_style("margin", "0 0 0.25rem 0")
                    .with_style("color", VAR_SECONDARY)
                    .with_child(VNode::text(subtitle)),
            );
        }
        if let Some(description) = &item.description {
            entry = entry.with_child(self.text("p", description).with_style("margin", "0 0 0.5rem 0"));
        }
        if let Some(details) = item.details.as_deref().filter(|d| !d.is_empty()) {
            entry = entry.with_child(self.bullet_list(details));
        }
        self.flash(
            entry,
            &HighlightTarget::Custom {
                section_id: section_id.to_string(),
                item_id: Some(item.id.clone()),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::style::StylingConfig;

    fn experience() -> Experience {
        Experience {
            id: "e1".to_string(),
            company: "Google".to_string(),
            role: "Engineer".to_string(),
            location: Some("Zurich".to_string()),
            start_date: "2020-03".to_string(),
            end_date: "2023-01-15".to_string(),
            current: false,
            achievements: vec!["Shipped <search>".to_string()],
        }
    }

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date("2020-03"), "Mar 2020");
        assert_eq!(format_date("2023-01-15"), "Jan 2023");
        assert_eq!(format_date("2020"), "2020");
        assert_eq!(format_date("Summer 2019"), "Summer 2019");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_current_role_ends_present() {
        let mut exp = experience();
        exp.current = true;
        assert_eq!(experience_dates(&exp), "Mar 2020 - Present");
    }

    #[test]
    fn test_education_dates_fall_back_to_end() {
        let edu = Education {
            id: "ed1".to_string(),
            school: "MIT".to_string(),
            degree: "BSc".to_string(),
            field: "CS".to_string(),
            location: None,
            start_date: String::new(),
            end_date: "2020".to_string(),
            gpa: None,
        };
        assert_eq!(education_dates(&edu), "2020");
    }

    #[test]
    fn test_experience_entry_escapes_and_flashes() {
        let styling = StylingConfig::default();
        let tokens = Tokens::new(&styling);
        let mut highlights = Highlights::default();
        highlights.add(&HighlightTarget::Experience {
            id: Some("e1".to_string()),
        });

        let mut renderer = SectionRenderer::new(&tokens, &highlights);
        let html = renderer.experience(&experience()).to_html();
        assert!(html.contains("Shipped &lt;search&gt;"));
        assert!(html.contains("Google • Zurich"));
        assert!(html.contains("highlight-flash"));
        assert_eq!(renderer.into_highlighted(), vec!["experience-e1".to_string()]);
    }

    #[test]
    fn test_compact_skills_render_as_one_line() {
        let mut styling = StylingConfig::default();
        let skills = vec!["Rust".to_string(), "Go".to_string()];
        let highlights = Highlights::default();

        styling.spacing = Spacing::Compact;
        let tokens = Tokens::new(&styling);
        let html = SectionRenderer::new(&tokens, &highlights).skills(&skills).to_html();
        assert!(html.contains("Rust • Go"));
        assert!(!html.contains("resume-skill\""));

        styling.spacing = Spacing::Normal;
        let tokens = Tokens::new(&styling);
        let html = SectionRenderer::new(&tokens, &highlights).skills(&skills).to_html();
        assert_eq!(html.matches("class=\"resume-skill\"").count(), 2);
    }

    #[test]
    fn test_header_placeholder_and_mailto() {
        let styling = StylingConfig::default();
        let tokens = Tokens::new(&styling);
        let highlights = Highlights::default();
        let mut renderer = SectionRenderer::new(&tokens, &highlights);

        let mut info = PersonalInfo::default();
        let html = renderer
            .header(&info, None, Alignment::Left, Alignment::Left)
            .to_html();
        assert!(html.contains("Your Name"));
        assert!(!html.contains("mailto:"));

        info.email = "ada@example.com".to_string();
        info.summary = Some("Builds compilers.".to_string());
        let html = renderer
            .header(&info, Some("data:image/png;base64,AA"), Alignment::Center, Alignment::Left)
            .to_html();
        assert!(html.contains("href=\"mailto:ada@example.com\""));
        assert!(html.contains("<img"));
        assert!(html.contains("text-align: left"));
    }

    #[test]
    fn test_education_gpa_and_field() {
        let styling = StylingConfig::default();
        let tokens = Tokens::new(&styling);
        let highlights = Highlights::default();
        let edu = Education {
            id: "ed1".to_string(),
            school: "MIT".to_string(),
            degree: "BSc".to_string(),
            field: "Computer Science".to_string(),
            location: Some("Cambridge, MA".to_string()),
            start_date: "2016-09".to_string(),
            end_date: "2020-06".to_string(),
            gpa: Some("3.9".to_string()),
        };
        let html = SectionRenderer::new(&tokens, &highlights)
            .education(&edu)
            .to_html();
        assert!(html.contains("BSc in Computer Science"));
        assert!(html.contains("GPA: 3.9"));
        assert!(html.contains("Sep 2016 - Jun 2020"));
        assert!(html.contains("Cambridge, MA"));
    }
}
