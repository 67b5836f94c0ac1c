//! Section segmentation classifier.
//!
//! Splits reading-order resume text into labeled sections with three
//! passes of line-level heuristics: a contact scan over the top of the
//! document, a header walk over the remainder, and a fallback that
//! recovers a projects section out of experience/unsorted content.
//! Pure string analysis; never fails, always returns a best-effort map.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The closed set of section labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionName {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Awards,
    Unsorted,
}

impl SectionName {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::Contact => "contact",
            SectionName::Summary => "summary",
            SectionName::Experience => "experience",
            SectionName::Education => "education",
            SectionName::Skills => "skills",
            SectionName::Projects => "projects",
            SectionName::Certifications => "certifications",
            SectionName::Awards => "awards",
            SectionName::Unsorted => "unsorted",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header keywords per section, checked in this order; the first matching
/// section wins.
const SECTION_KEYWORDS: &[(SectionName, &[&str])] = &[
    (
        SectionName::Contact,
        &["contact", "personal information", "personal info"],
    ),
    (
        SectionName::Summary,
        &["summary", "profile", "objective", "professional summary"],
    ),
    (
        SectionName::Experience,
        &["experience", "work experience", "employment", "work history"],
    ),
    (
        SectionName::Education,
        &["education", "academic", "qualifications", "training"],
    ),
    (
        SectionName::Skills,
        &["skills", "competencies", "expertise", "technical skills"],
    ),
    (
        SectionName::Projects,
        &["projects", "personal projects", "academic projects"],
    ),
    (
        SectionName::Certifications,
        &["certifications", "certificates", "licenses"],
    ),
    (SectionName::Awards, &["awards", "honors", "achievements"]),
];

/// A line near the top of the document containing any of these belongs to
/// the contact block.
const CONTACT_MARKERS: &[&str] = &[
    "@", "gmail", "email", "phone", "tel:", "+", "linkedin", "github",
];

/// Technology names that mark a line as project content even without
/// header formatting.
const PROJECT_TECH: &[&str] = &["python", "javascript", "java", "react", "node", "django"];

/// Trigger words for the fallback pass. The trailing space keeps "react"
/// from matching inside words like "reactive".
const FALLBACK_TECH: &[&str] = &["react ", "angular ", "vue ", "django ", "flask "];

const CONTACT_SCAN_LINES: usize = 10;
const MAX_CONTACT_LINES: usize = 5;
const MAX_HEADER_CHARS: usize = 50;

/// Finalized mapping from section label to trimmed content, kept in
/// first-touch order. Serializes as a JSON object keyed by the lowercase
/// labels in that same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionMap {
    entries: Vec<(SectionName, String)>,
}

impl SectionMap {
    pub fn get(&self, name: SectionName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, content)| content.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = SectionName> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrites in place if the section was already touched, otherwise
    /// appends at the end.
    fn set(&mut self, name: SectionName, content: String) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = content,
            None => self.entries.push((name, content)),
        }
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, content) in &self.entries {
            map.serialize_entry(name.as_str(), content)?;
        }
        map.end()
    }
}

/// Growable line buffers, one per touched section, in first-touch order.
/// Finalized exactly once into an immutable `SectionMap`.
#[derive(Debug, Default)]
struct SectionBuilder {
    buffers: Vec<(SectionName, Vec<String>)>,
}

impl SectionBuilder {
    fn buffer(&mut self, name: SectionName) -> &mut Vec<String> {
        let pos = match self.buffers.iter().position(|(n, _)| *n == name) {
            Some(pos) => pos,
            None => {
                self.buffers.push((name, Vec::new()));
                self.buffers.len() - 1
            }
        };
        &mut self.buffers[pos].1
    }

    fn push(&mut self, name: SectionName, line: &str) {
        self.buffer(name).push(line.to_string());
    }

    /// Drops any accumulated content; the section keeps its original
    /// position in the map.
    fn reset(&mut self, name: SectionName) {
        self.buffer(name).clear();
    }

    fn finish(self) -> SectionMap {
        let mut map = SectionMap::default();
        for (name, lines) in self.buffers {
            map.set(name, lines.join("\n").trim().to_string());
        }
        map
    }
}

/// Classifies reading-order text into labeled resume sections.
/// Deterministic; an empty input yields a map holding only `unsorted`.
pub fn classify(text: &str) -> SectionMap {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut builder = SectionBuilder::default();
    builder.buffer(SectionName::Unsorted);

    let contact_line_count = collect_contact(&lines, &mut builder);
    walk_sections(&lines, contact_line_count, &mut builder);

    let mut sections = builder.finish();
    recover_projects(&mut sections);
    sections
}

/// Scans the first lines of the document for a contact block: the name on
/// line 0, lines carrying contact markers, and a handful of continuation
/// lines. Consumption is a contiguous prefix; the scan stops at the first
/// line it cannot claim, and the main walk resumes exactly there.
fn collect_contact(lines: &[&str], builder: &mut SectionBuilder) -> usize {
    let mut count = 0;

    for (i, line) in lines.iter().take(CONTACT_SCAN_LINES).enumerate() {
        let lower = line.to_lowercase();
        let non_blank = !line.trim().is_empty();

        let claimed = if i == 0 {
            non_blank
        } else if CONTACT_MARKERS.iter().any(|m| lower.contains(m)) {
            true
        } else {
            non_blank && count > 0 && count < MAX_CONTACT_LINES
        };

        if !claimed {
            break;
        }
        builder.push(SectionName::Contact, line);
        count += 1;
    }

    count
}

/// Mirrors the uppercase test used for header detection: at least one
/// cased character and no lowercase ones.
fn is_all_caps(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// A short line with header formatting: all caps, a trailing colon, or a
/// bullet/markdown marker.
fn is_header_candidate(line: &str) -> bool {
    !line.is_empty()
        && line.chars().count() < MAX_HEADER_CHARS
        && (is_all_caps(line)
            || line.ends_with(':')
            || line.starts_with('\u{2022}')
            || ["#", "-", "*"].iter().any(|m| line.starts_with(m)))
}

/// A header that carries no content of its own; switching section discards
/// the line itself.
fn is_pure_header(line: &str) -> bool {
    line.starts_with('#') || is_all_caps(line) || line.ends_with(':')
}

fn match_header(line: &str, lower: &str) -> Option<SectionName> {
    if is_header_candidate(line) {
        if let Some((name, _)) = SECTION_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        {
            return Some(*name);
        }
    }

    // Project titles often skip header formatting entirely; catch lines
    // like "My React Project (Node, MongoDB)".
    if lower.contains("project")
        && (line.ends_with(')')
            || lower.contains("tech stack:")
            || PROJECT_TECH.iter().any(|t| lower.contains(t)))
    {
        return Some(SectionName::Projects);
    }

    None
}

/// The main walk: every line either switches the current section (header
/// match) or lands in the current section's buffer. No line is dropped
/// except pure header markers.
fn walk_sections(lines: &[&str], start: usize, builder: &mut SectionBuilder) {
    let mut current = SectionName::Unsorted;

    for raw in lines.iter().skip(start) {
        let line = raw.trim();
        let lower = line.to_lowercase();

        match match_header(line, &lower) {
            Some(section) => {
                current = section;
                builder.reset(section);
                if !is_pure_header(line) {
                    builder.push(section, line);
                }
            }
            None => builder.push(current, line),
        }
    }
}

/// Fallback recovery: when no projects section was found, rescan the
/// experience and unsorted content for project-looking lines. Once capture
/// starts it runs to the end of the scanned text, absorbing blank lines
/// too; the final join is trimmed.
fn recover_projects(sections: &mut SectionMap) {
    if sections
        .get(SectionName::Projects)
        .is_some_and(|content| !content.is_empty())
    {
        return;
    }

    let candidate = format!(
        "{}\n{}",
        sections.get(SectionName::Experience).unwrap_or(""),
        sections.get(SectionName::Unsorted).unwrap_or("")
    );

    let mut captured: Vec<&str> = Vec::new();
    let mut started = false;

    for line in candidate.split('\n') {
        let lower = line.to_lowercase();

        if lower.contains("project") || FALLBACK_TECH.iter().any(|t| lower.contains(t)) {
            started = true;
            captured.push(line);
        } else if started {
            if !line.trim().is_empty() {
                captured.push(line);
            } else if !captured.is_empty() {
                captured.push(line);
            }
        }
    }

    if !captured.is_empty() {
        sections.set(
            SectionName::Projects,
            captured.join("\n").trim().to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_unsorted_only() {
        let sections = classify("");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get(SectionName::Unsorted), Some(""));
    }

    #[test]
    fn test_basic_resume_scenario() {
        let text = "Jane Doe\njane@example.com\n\nEXPERIENCE\nSoftware Engineer at Acme\n\nSKILLS\nPython, Go";
        let sections = classify(text);

        let contact = sections.get(SectionName::Contact).unwrap();
        assert!(contact.contains("Jane Doe"));
        assert!(contact.contains("jane@example.com"));
        assert_eq!(
            sections.get(SectionName::Experience),
            Some("Software Engineer at Acme")
        );
        assert_eq!(sections.get(SectionName::Skills), Some("Python, Go"));
    }

    #[test]
    fn test_contact_stops_at_blank_line() {
        let text = "Jane Doe\njane@example.com\n\nEXPERIENCE\nBuilt things";
        let sections = classify(text);
        let contact = sections.get(SectionName::Contact).unwrap();
        assert_eq!(contact, "Jane Doe\njane@example.com");
    }

    #[test]
    fn test_contact_marker_lines_collected() {
        let text = "John Smith\nphone: 555-0100\nlinkedin.com/in/jsmith\ngithub.com/jsmith";
        let sections = classify(text);
        let contact = sections.get(SectionName::Contact).unwrap();
        assert!(contact.contains("phone: 555-0100"));
        assert!(contact.contains("linkedin.com/in/jsmith"));
        assert!(contact.contains("github.com/jsmith"));
    }

    #[test]
    fn test_contact_continuation_capped_at_five_lines() {
        // Six plain lines with no markers and no blank separators: the
        // name plus four continuation lines are claimed, nothing more.
        let text = "Name\naddr one\naddr two\naddr three\naddr four\noverflow line";
        let sections = classify(text);
        let contact = sections.get(SectionName::Contact).unwrap();
        assert_eq!(contact.split('\n').count(), 5);
        assert!(!contact.contains("overflow line"));
        assert!(sections
            .get(SectionName::Unsorted)
            .unwrap()
            .contains("overflow line"));
    }

    #[test]
    fn test_blank_first_line_skips_contact_block() {
        let sections = classify("\nSome prose line\nmore prose");
        assert_eq!(sections.get(SectionName::Contact), None);
        let unsorted = sections.get(SectionName::Unsorted).unwrap();
        assert!(unsorted.contains("Some prose line"));
        assert!(unsorted.contains("more prose"));
    }

    #[test]
    fn test_no_headers_lands_in_unsorted() {
        // After a blank line the contact heuristic releases its claim, so
        // the prose body falls through to unsorted untouched.
        let text = "Jane Doe\n\nplain prose here\nno headers anywhere\nnothing to see";
        let sections = classify(text);
        assert_eq!(
            sections.get(SectionName::Unsorted),
            Some("plain prose here\nno headers anywhere\nnothing to see")
        );
    }

    #[test]
    fn test_all_caps_header_switches_section() {
        let text = "Jane\n\nEDUCATION\nBS Computer Science";
        let sections = classify(text);
        assert_eq!(
            sections.get(SectionName::Education),
            Some("BS Computer Science")
        );
    }

    #[test]
    fn test_colon_header_switches_section() {
        let text = "Jane\n\nSkills:\nRust, Go, Python here";
        let sections = classify(text);
        assert_eq!(sections.get(SectionName::Skills), Some("Rust, Go, Python here"));
    }

    #[test]
    fn test_pure_header_line_is_discarded() {
        let text = "Jane\n\nEXPERIENCE\nActual content";
        let sections = classify(text);
        let experience = sections.get(SectionName::Experience).unwrap();
        assert!(!experience.contains("EXPERIENCE"));
        assert_eq!(experience, "Actual content");
    }

    #[test]
    fn test_bullet_header_seeds_buffer_with_line() {
        // "- Skills overview" matches the skills keywords but is not a
        // pure header marker, so the line itself becomes content.
        let text = "Jane\n\n- Skills overview\nRust and Go";
        let sections = classify(text);
        assert_eq!(
            sections.get(SectionName::Skills),
            Some("- Skills overview\nRust and Go")
        );
    }

    #[test]
    fn test_long_line_is_not_a_header() {
        let long_header = "EXPERIENCE AND OTHER PROFESSIONAL ACTIVITIES I HAVE DONE OVER THE YEARS";
        assert!(long_header.chars().count() >= 50);
        let text = format!("Jane\n\n{long_header}\ncontent line");
        let sections = classify(&text);
        assert_eq!(sections.get(SectionName::Experience), None);
        assert!(sections
            .get(SectionName::Unsorted)
            .unwrap()
            .contains("content line"));
    }

    #[test]
    fn test_first_keyword_match_wins() {
        // "work experience" also contains "experience"; the dictionary
        // order settles which section claims it.
        let text = "Jane\n\nWORK EXPERIENCE\nshipped software";
        let sections = classify(text);
        assert_eq!(sections.get(SectionName::Experience), Some("shipped software"));
    }

    #[test]
    fn test_repeated_header_resets_buffer() {
        let text = "Jane\n\nSKILLS\nfirst batch\nSKILLS\nsecond batch";
        let sections = classify(text);
        assert_eq!(sections.get(SectionName::Skills), Some("second batch"));
    }

    #[test]
    fn test_implicit_project_title_with_parenthesis() {
        let text = "Jane\n\nMy React Project (Node, MongoDB)\nbuilt a realtime dashboard";
        let sections = classify(text);
        assert_eq!(
            sections.get(SectionName::Projects),
            Some("My React Project (Node, MongoDB)\nbuilt a realtime dashboard")
        );
    }

    #[test]
    fn test_implicit_project_with_tech_stack_marker() {
        let text = "Jane\n\nInventory project, tech stack: Rust and Postgres\ndetails follow";
        let sections = classify(text);
        let projects = sections.get(SectionName::Projects).unwrap();
        assert!(projects.contains("Inventory project"));
        assert!(projects.contains("details follow"));
    }

    #[test]
    fn test_fallback_recovers_projects_from_unsorted() {
        let text = "Jane Doe\n\nBuilt a project using Flask\nand shipped it to production";
        let sections = classify(text);
        let projects = sections.get(SectionName::Projects).unwrap();
        assert!(projects.contains("Built a project using Flask"));
        assert!(projects.contains("and shipped it to production"));
    }

    #[test]
    fn test_fallback_recovers_projects_from_experience() {
        let text = "Jane\njane@x.com\n\nEXPERIENCE\nAcme Corp\nBuilt a project using Flask\nShipped weekly";
        let sections = classify(text);
        // Experience keeps its content; the fallback only copies.
        assert!(sections
            .get(SectionName::Experience)
            .unwrap()
            .contains("Built a project using Flask"));
        let projects = sections.get(SectionName::Projects).unwrap();
        assert!(projects.starts_with("Built a project using Flask"));
        assert!(projects.contains("Shipped weekly"));
    }

    #[test]
    fn test_fallback_absorbs_trailing_content() {
        // Capture never terminates once started: lines after a blank are
        // absorbed too. Deliberately preserved behavior.
        let text = "Jane\n\nused django for a side project\n\nunrelated closing note";
        let sections = classify(text);
        let projects = sections.get(SectionName::Projects).unwrap();
        assert!(projects.contains("unrelated closing note"));
    }

    #[test]
    fn test_fallback_skipped_when_projects_found() {
        let text = "Jane\n\nPROJECTS\nchess engine in Rust\n\nEXPERIENCE\nbuilt a project using Flask";
        let sections = classify(text);
        assert_eq!(
            sections.get(SectionName::Projects),
            Some("chess engine in Rust")
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let text = "Jane Doe\njane@example.com\n\nEXPERIENCE\nSoftware Engineer at Acme\n\nSKILLS\nPython, Go";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_every_line_attributed_once() {
        // Coverage check: the concatenation of all buffers (before any
        // fallback copying) accounts for every non-header input line.
        let text = "Jane Doe\njane@example.com\n\nEDUCATION\nBS at State\nGPA 3.9\n\nSKILLS\nRust";
        let sections = classify(text);

        for needle in ["Jane Doe", "jane@example.com", "BS at State", "GPA 3.9", "Rust"] {
            let hits = sections
                .names()
                .filter(|&name| name != SectionName::Projects)
                .filter(|&name| sections.get(name).unwrap().contains(needle))
                .count();
            assert_eq!(hits, 1, "line {needle:?} attributed {hits} times");
        }
    }

    #[test]
    fn test_unsorted_always_first() {
        let text = "Jane\njane@x.com\n\nSKILLS\nRust";
        let sections = classify(text);
        assert_eq!(sections.names().next(), Some(SectionName::Unsorted));
    }

    #[test]
    fn test_serializes_in_first_touch_order() {
        let text = "Jane\njane@x.com\n\nSKILLS\nRust\nEDUCATION\nBS";
        let sections = classify(text);
        let json = serde_json::to_string(&sections).unwrap();

        let unsorted = json.find("\"unsorted\"").unwrap();
        let contact = json.find("\"contact\"").unwrap();
        let skills = json.find("\"skills\"").unwrap();
        let education = json.find("\"education\"").unwrap();
        assert!(unsorted < contact);
        assert!(contact < skills);
        assert!(skills < education);
    }

    #[test]
    fn test_section_content_is_trimmed() {
        let text = "Jane\n\nSKILLS\nRust\n\n\n";
        let sections = classify(text);
        assert_eq!(sections.get(SectionName::Skills), Some("Rust"));
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("EXPERIENCE"));
        assert!(is_all_caps("WORK HISTORY:"));
        assert!(!is_all_caps("Experience"));
        assert!(!is_all_caps("1234"));
        assert!(!is_all_caps(""));
    }
}
