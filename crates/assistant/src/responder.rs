//! Canned assistant replies.
//!
//! The reply is chosen by keyword: the first rule whose vocabulary appears in
//! the instruction wins. Japanese terms match as-is, Latin terms ignore case.

/// Changes to apply to the slide preview; `None` leaves that part alone
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlideUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub message: String,
    pub slide: SlideUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseRule {
    Title,
    Structure,
    Summary,
    Insight,
    Fallback,
}

const RULES: &[(ResponseRule, &[&str])] = &[
    (ResponseRule::Title, &["タイトル", "title"]),
    (ResponseRule::Structure, &["構造化", "structure"]),
    (ResponseRule::Summary, &["要約", "summar"]),
    (ResponseRule::Insight, &["インサイト", "データ", "insight", "data"]),
];

/// Prefix on replies produced by re-running a request
pub const RERUN_PREFIX: &str = "Re-ran:";

pub fn classify(instruction: &str) -> ResponseRule {
    let lower = instruction.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(rule, _)| *rule)
        .unwrap_or(ResponseRule::Fallback)
}

/// Reply to a chat instruction. `current_title` is quoted when the title changes.
pub fn respond(instruction: &str, current_title: &str) -> AssistantReply {
    match classify(instruction) {
        ResponseRule::Title => AssistantReply {
            message: format!(
                "Updated the slide title.\nPrevious title: \"{}\"",
                current_title
            ),
            slide: SlideUpdate {
                title: Some("An Innovative Strategy to Lead the Market".into()),
                body: None,
            },
        },
        ResponseRule::Structure => AssistantReply {
            message: "Reorganized the slide structure.".into(),
            slide: SlideUpdate {
                title: Some("Business Environment and Strategy".into()),
                body: Some(
                    "• Challenge: competitors catching up and intensifying price competition\n\
                     • Solution: differentiate and move upmarket with the \"Alpha\" product\n\
                     • Expected impact: 5% margin improvement and regained share\n\
                     \n\
                     (structured diagram)"
                        .into(),
                ),
            },
        },
        ResponseRule::Summary => AssistantReply {
            message: "Summarized the slide content.".into(),
            slide: SlideUpdate {
                title: None,
                body: Some(
                    "Q3 revenue and profit both reached record highs.\n\
                     With the new product contributing, the full-year target is within reach."
                        .into(),
                ),
            },
        },
        ResponseRule::Insight => AssistantReply {
            message: "Extracted insights from the data and applied them to the slide.".into(),
            slide: SlideUpdate {
                title: Some("Shifting User Demographics and What They Mean".into()),
                body: Some(
                    "• Younger users up 40% year over year\n\
                     • Mobile conversion rate now ahead of desktop\n\
                     \n\
                     (chart: user demographics over time)"
                        .into(),
                ),
            },
        },
        ResponseRule::Fallback => AssistantReply {
            message: "Polished the slide based on your instructions.".into(),
            slide: SlideUpdate {
                title: Some("Improved Slide Draft".into()),
                body: Some(
                    "• The key points are clearer\n\
                     • Visual impact is stronger\n\
                     • Action items are more concrete"
                        .into(),
                ),
            },
        },
    }
}

/// Reply to a re-run of `last_instruction`, or of an empty request if there was none
pub fn rerun_reply(last_instruction: Option<&str>, current_title: &str) -> AssistantReply {
    let mut reply = respond(last_instruction.unwrap_or_default(), current_title);
    reply.message = format!("{}\n{}", RERUN_PREFIX, reply.message);
    reply
}

/// The document produced by a generation request
pub fn generated_document() -> SlideUpdate {
    SlideUpdate {
        title: Some("System Adoption Decision Document".into()),
        body: Some(
            "1. Purpose and background\n\
             Reduce the rising operating cost and security risk of the legacy system, \
             and streamline work as part of the digital transformation push.\n\
             \n\
             2. Comparison\n\
             Item      | Option A (SaaS) | Option B (in-house)\n\
             Cost      | low             | high\n\
             Lead time | short           | long"
                .into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_vocabulary() {
        assert_eq!(classify("タイトルを変えて"), ResponseRule::Title);
        assert_eq!(classify("Make the TITLE punchier"), ResponseRule::Title);
        assert_eq!(classify("構造化してください"), ResponseRule::Structure);
        assert_eq!(classify("Restructure this"), ResponseRule::Structure);
        assert_eq!(classify("要約して"), ResponseRule::Summary);
        assert_eq!(classify("Summarize briefly"), ResponseRule::Summary);
        assert_eq!(classify("データから示唆を"), ResponseRule::Insight);
        assert_eq!(classify("Any insights?"), ResponseRule::Insight);
        assert_eq!(classify("make it nicer"), ResponseRule::Fallback);
        assert_eq!(classify(""), ResponseRule::Fallback);
    }

    #[test]
    fn test_rules_are_checked_in_order() {
        // Title beats everything after it
        assert_eq!(classify("summarize the title using data"), ResponseRule::Title);
        assert_eq!(classify("structure the data"), ResponseRule::Structure);
    }

    #[test]
    fn test_title_reply_quotes_previous_title() {
        let reply = respond("new title please", "Q3 Financial Results");
        assert!(reply.message.contains("\"Q3 Financial Results\""));
        assert!(reply.slide.title.is_some());
        assert!(reply.slide.body.is_none());
    }

    #[test]
    fn test_summary_keeps_title() {
        let reply = respond("summary", "Anything");
        assert!(reply.slide.title.is_none());
        assert!(reply.slide.body.is_some());
    }

    #[test]
    fn test_rerun_replays_last_instruction() {
        let reply = rerun_reply(Some("要約して"), "T");
        assert!(reply.message.starts_with(RERUN_PREFIX));
        assert_eq!(reply.slide, respond("要約して", "T").slide);

        let fallback = rerun_reply(None, "T");
        assert_eq!(fallback.slide, respond("", "T").slide);
    }
}
