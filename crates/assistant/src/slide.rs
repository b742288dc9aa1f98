use crate::responder::SlideUpdate;

pub const INITIAL_TITLE: &str = "Q3 Financial Results";
const INITIAL_BODY: &str = "• Revenue: $12.4M (+18% YoY)\n\
                            • Operating margin: 21%\n\
                            • New customers: 340\n\
                            \n\
                            (chart: quarterly revenue)";

/// The slide shown in the preview pane. Lives for the session only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePreview {
    pub title: String,
    pub body: String,
}

impl Default for SlidePreview {
    fn default() -> Self {
        Self {
            title: INITIAL_TITLE.to_string(),
            body: INITIAL_BODY.to_string(),
        }
    }
}

impl SlidePreview {
    pub fn apply(&mut self, update: &SlideUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(body) = &update.body {
            self.body = body.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update() {
        let mut slide = SlidePreview::default();
        let body = slide.body.clone();

        slide.apply(&SlideUpdate {
            title: Some("New".into()),
            body: None,
        });
        assert_eq!(slide.title, "New");
        assert_eq!(slide.body, body);

        slide.apply(&SlideUpdate::default());
        assert_eq!(slide.title, "New");
    }
}
