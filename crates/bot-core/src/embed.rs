//! Response formatting: embeds, replies and interactive components.

use chrono::{DateTime, Utc};

/// Longest embed description Discord accepts, in characters.
pub const MAX_DESCRIPTION: usize = 4096;

/// Embed accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour(pub u32);

impl Colour {
    pub const GREEN: Colour = Colour(0x72b01d);
    pub const RED: Colour = Colour(0xb01d1f);
    pub const BLACK: Colour = Colour(0x000000);
    pub const ORANGE: Colour = Colour(0xF59E42);
    pub const PINK: Colour = Colour(0xD75BF4);
}

/// Status of a response, mapped to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Success or neutral result.
    Success,
    /// Failure or denial.
    Failure,
    /// Informational listing.
    Info,
}

impl Status {
    pub fn colour(self) -> Colour {
        match self {
            Status::Success => Colour::GREEN,
            Status::Failure => Colour::RED,
            Status::Info => Colour::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Structured message body.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Colour,
    pub fields: Vec<EmbedField>,
    pub author: Option<EmbedAuthor>,
    pub footer: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Embed {
    pub fn new(colour: Colour) -> Self {
        Self {
            title: None,
            description: None,
            colour,
            fields: Vec::new(),
            author: None,
            footer: None,
            image: None,
            thumbnail: None,
            timestamp: None,
        }
    }

    pub fn status(status: Status) -> Self {
        Self::new(status.colour())
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::status(Status::Success).description(description)
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self::status(Status::Failure).description(description)
    }

    /// Red "Error!" embed.
    pub fn error(description: impl Into<String>) -> Self {
        Self::failure(description).title("Error!")
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description, cut to [`MAX_DESCRIPTION`] characters.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let mut description = description.into();
        if let Some((cut, _)) = description.char_indices().nth(MAX_DESCRIPTION) {
            description.truncate(cut);
        }
        self.description = Some(description);
        self
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub style: ButtonStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub custom_id: String,
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
}

/// One row of interactive components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRow {
    Buttons(Vec<Button>),
    Select(SelectMenu),
}

impl ActionRow {
    /// Every custom id in the row.
    pub fn custom_ids(&self) -> Vec<&str> {
        match self {
            ActionRow::Buttons(buttons) => buttons.iter().map(|b| b.custom_id.as_str()).collect(),
            ActionRow::Select(menu) => vec![menu.custom_id.as_str()],
        }
    }
}

/// Outbound message. On edits, `None` content and an empty component list
/// clear the previous content and components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub components: Vec<ActionRow>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_component(mut self, row: ActionRow) -> Self {
        self.components.push(row);
        self
    }
}

impl From<Embed> for Reply {
    fn from(embed: Embed) -> Self {
        Reply::embed(embed)
    }
}
