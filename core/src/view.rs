//! View models for the chat log, suggestion chips, export panel and toolbar.

use crate::models::ExportResponse;

/// Image attachments beyond this many are not shown.
pub const MAX_IMAGES: usize = 3;

pub const EXPORT_EMPTY_MESSAGE: &str = "No export links are available yet.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntryBody {
    Text(String),
    Review(String),
    Images(Vec<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptEntry {
    pub id: u64,
    pub role: Role,
    pub body: EntryBody,
}

#[derive(Clone, Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.push(role, EntryBody::Text(text.into()));
    }

    pub fn append_review(&mut self, review: impl Into<String>) {
        self.push(Role::Assistant, EntryBody::Review(review.into()));
    }

    /// Adds an assistant image block holding at most [`MAX_IMAGES`] urls.
    pub fn append_images(&mut self, urls: &[String]) {
        let urls: Vec<String> = urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .take(MAX_IMAGES)
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            return;
        }
        self.push(Role::Assistant, EntryBody::Images(urls));
    }

    /// Entry ids keep counting across clears so keyed lists never reuse one.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, role: Role, body: EntryBody) {
        self.next_id += 1;
        self.entries.push(TranscriptEntry { id: self.next_id, role, body });
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Suggestions(Vec<String>);

impl Suggestions {
    pub fn replace(&mut self, items: Vec<String>) {
        self.0 = items;
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportLinkView {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExportView {
    /// Nothing requested yet.
    #[default]
    Hidden,
    /// Export failed or produced no links.
    Empty,
    Links(Vec<ExportLinkView>),
}

impl ExportView {
    pub fn from_response(response: &ExportResponse) -> Self {
        if !response.ok || response.links.is_empty() {
            return ExportView::Empty;
        }
        ExportView::Links(
            response
                .links
                .iter()
                .map(|link| ExportLinkView {
                    label: format!("Open Day {} in Google Maps", link.day),
                    url: link.url.clone(),
                })
                .collect(),
        )
    }
}

/// Toolbar toggles driven by `ui.enableButton`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub route_enabled: bool,
    pub export_enabled: bool,
}

impl Controls {
    /// Returns `false` for a button this page does not have.
    pub fn enable(&mut self, name: &str) -> bool {
        match name.trim().to_ascii_lowercase().as_str() {
            "route" | "create_route" => self.route_enabled = true,
            "export" => self.export_enabled = true,
            _ => return false,
        }
        true
    }

    pub fn disable_all(&mut self) {
        *self = Controls::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportLink;

    #[test]
    fn transcript_ids_increase_and_survive_clear() {
        let mut t = Transcript::default();
        t.append(Role::User, "hi");
        t.append(Role::Assistant, "Namaste");
        assert_eq!(t.entries()[0].id, 1);
        assert_eq!(t.entries()[1].role, Role::Assistant);

        t.clear();
        assert!(t.is_empty());
        t.append(Role::User, "again");
        assert_eq!(t.entries()[0].id, 3);
    }

    #[test]
    fn image_block_is_capped_at_three() {
        let mut t = Transcript::default();
        let urls: Vec<String> = (1..=5).map(|i| format!("https://img/{i}.jpg")).collect();
        t.append_images(&urls);
        match &t.entries()[0].body {
            EntryBody::Images(shown) => assert_eq!(shown.len(), MAX_IMAGES),
            other => panic!("unexpected {other:?}"),
        }

        t.append_images(&[]);
        assert_eq!(t.entries().len(), 1);
    }

    #[test]
    fn export_view_labels_each_day() {
        let view = ExportView::from_response(&ExportResponse {
            ok: true,
            links: vec![ExportLink { day: 1, url: "https://maps.google.com/?day=1".into() }],
        });
        assert_eq!(
            view,
            ExportView::Links(vec![ExportLinkView {
                label: "Open Day 1 in Google Maps".into(),
                url: "https://maps.google.com/?day=1".into(),
            }])
        );
    }

    #[test]
    fn failed_or_empty_export_shows_empty_state() {
        let failed = ExportResponse {
            ok: false,
            links: vec![ExportLink { day: 1, url: "x".into() }],
        };
        assert_eq!(ExportView::from_response(&failed), ExportView::Empty);
        assert_eq!(ExportView::from_response(&ExportResponse { ok: true, links: vec![] }), ExportView::Empty);
    }

    #[test]
    fn controls_only_know_their_buttons() {
        let mut c = Controls::default();
        assert!(c.enable("export"));
        assert!(!c.enable("teleport"));
        assert_eq!(c, Controls { route_enabled: false, export_enabled: true });
        c.disable_all();
        assert_eq!(c, Controls::default());
    }
}
