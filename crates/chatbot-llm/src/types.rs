/// The parts of one streamed completion event the decoder cares about.
///
/// Empty strings are treated the same as absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDelta {
    pub role: Option<String>,
    pub reasoning: Option<String>,
    pub content: Option<String>,
}

impl StreamDelta {
    pub fn role(&self) -> Option<&str> {
        non_empty(self.role.as_deref())
    }

    pub fn reasoning(&self) -> Option<&str> {
        non_empty(self.reasoning.as_deref())
    }

    pub fn content(&self) -> Option<&str> {
        non_empty(self.content.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
