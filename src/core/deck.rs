//! # Deck Content
//!
//! The words on each slide. Navigation only ever deals in indices; this is
//! what the presenter looks those indices up in.

use crate::core::navigation::{TOTAL_QUOTES, TOTAL_SLIDES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Welcome,
    Quotes,
    Wishes,
    Memories,
    Finale,
}

#[derive(Debug, Clone, Copy)]
pub struct CardText {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Slide {
    pub kind: SlideKind,
    pub title: &'static str,
    pub body: &'static str,
    /// Label of the slide's celebration button, if it has one.
    pub button: Option<&'static str>,
    pub cards: &'static [CardText],
}

#[derive(Debug, Clone, Copy)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const SLIDES: [Slide; TOTAL_SLIDES] = [
    Slide {
        kind: SlideKind::Welcome,
        title: "Happy Birthday",
        body: "Today is all about you. Swipe, click or press → to begin.",
        button: Some("Start the journey"),
        cards: &[],
    },
    Slide {
        kind: SlideKind::Quotes,
        title: "Words for You",
        body: "",
        button: None,
        cards: &[],
    },
    Slide {
        kind: SlideKind::Wishes,
        title: "My Wishes for You",
        body: "Click a card to open it.",
        button: None,
        cards: &WISHES,
    },
    Slide {
        kind: SlideKind::Memories,
        title: "Favorite Memories",
        body: "A few of the moments worth keeping.",
        button: None,
        cards: &MEMORIES,
    },
    Slide {
        kind: SlideKind::Finale,
        title: "Let's Celebrate!",
        body: "Here's to another year of laughter, adventures and cake.",
        button: Some("Celebrate"),
        cards: &[],
    },
];

const WISHES: [CardText; 3] = [
    CardText {
        title: "Joy",
        body: "May every day bring you a reason to smile.",
    },
    CardText {
        title: "Adventure",
        body: "New places, new faces, new stories to tell.",
    },
    CardText {
        title: "Love",
        body: "Surrounded always by the people who cherish you.",
    },
];

const MEMORIES: [CardText; 3] = [
    CardText {
        title: "Road Trips",
        body: "Wrong turns that became the best detours.",
    },
    CardText {
        title: "Late Nights",
        body: "Talking until the sun came up.",
    },
    CardText {
        title: "Laughter",
        body: "The jokes nobody else understands.",
    },
];

pub const QUOTES: [Quote; TOTAL_QUOTES] = [
    Quote {
        text: "Count your age by friends, not years. Count your life by smiles, not tears.",
        author: "John Lennon",
    },
    Quote {
        text: "The more you praise and celebrate your life, the more there is in life to celebrate.",
        author: "Oprah Winfrey",
    },
    Quote {
        text: "Age is an issue of mind over matter. If you don't mind, it doesn't matter.",
        author: "Mark Twain",
    },
    Quote {
        text: "You are never too old to set another goal or to dream a new dream.",
        author: "C. S. Lewis",
    },
    Quote {
        text: "Life isn't about finding yourself. Life is about creating yourself.",
        author: "George Bernard Shaw",
    },
];

/// Title of a slide with the recipient's name worked in where it fits.
pub fn slide_title(index: usize, recipient: &str) -> String {
    let slide = &SLIDES[index.min(TOTAL_SLIDES - 1)];
    match slide.kind {
        SlideKind::Welcome if !recipient.is_empty() => format!("{}, {}!", slide.title, recipient),
        SlideKind::Welcome => format!("{}!", slide.title),
        _ => slide.title.to_string(),
    }
}
