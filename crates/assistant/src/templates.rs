use shared::state::BuiltinTemplate;

/// Prompts that ship with the app, shown below custom templates
pub const BUILTIN_TEMPLATES: [BuiltinTemplate; 4] = [
    BuiltinTemplate {
        title: "Sharpen the title",
        body: "Suggest a more compelling title for this slide.",
        desc: "Rewrite the slide title",
    },
    BuiltinTemplate {
        title: "Structure the content",
        body: "Structure this slide into challenge, solution and impact.",
        desc: "Organize into bullet points",
    },
    BuiltinTemplate {
        title: "Summarize",
        body: "Summarize this slide in two sentences.",
        desc: "Condense to the key message",
    },
    BuiltinTemplate {
        title: "Data insights",
        body: "Extract the key insights from the data on this slide.",
        desc: "Highlight trends in the numbers",
    },
];
