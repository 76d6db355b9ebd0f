//! Scholarly citation model with APA-style rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One scholarly work returned by the citation lookup.
///
/// Produced fresh per request and never cached across sessions. The
/// `Display` impl renders the APA-style line embedded into prompts:
/// `Author(s) (Year). Title. *Venue*. [DOI url]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Author display names in publication order.
    pub authors: Vec<String>,
    /// Publication year; `None` renders as "n.d.".
    pub year: Option<i32>,
    pub title: String,
    /// Hosting venue; `None` renders as "Unknown Journal".
    pub venue: Option<String>,
    /// DOI URL, appended only when present.
    pub doi: Option<String>,
}

impl Citation {
    /// Joins authors with commas and an ampersand before the last.
    fn author_string(&self) -> String {
        match self.authors.as_slice() {
            [] => "Unknown Author".to_string(),
            [single] => single.clone(),
            [init @ .., last] => format!("{}, & {last}", init.join(", ")),
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = match self.year {
            Some(y) => y.to_string(),
            None => "n.d.".to_string(),
        };
        let venue = self.venue.as_deref().unwrap_or("Unknown Journal");

        write!(
            f,
            "{} ({year}). {}. *{venue}*.",
            self.author_string(),
            self.title
        )?;
        if let Some(doi) = &self.doi {
            write!(f, " {doi}")?;
        }
        Ok(())
    }
}
