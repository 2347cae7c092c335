//! UI events and the explorer selection they can change.

use super::Step;
use crate::error::{Result, StoryError};
use crate::schema::Column;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding channel a selector control drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    X,
    Y,
    Color,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Color => "color",
        };
        f.write_str(name)
    }
}

/// Every input the story reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Next,
    Previous,
    Jump { step: Step },
    Reset,
    /// Change an explorer channel. `column` is a raw label or camel-case alias.
    Select { channel: Channel, column: String },
    HoverEnter { key: String },
    HoverLeave,
}

/// Columns the explorer step encodes on each channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerSelection {
    pub x: Column,
    pub y: Column,
    pub color: Column,
}

impl Default for ExplorerSelection {
    fn default() -> Self {
        Self {
            x: Column::YearPublished,
            y: Column::UsersRated,
            color: Column::PrimaryDomain,
        }
    }
}

impl ExplorerSelection {
    pub fn get(&self, channel: Channel) -> Column {
        match channel {
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Color => self.color,
        }
    }

    /// Assign a column to a channel.
    ///
    /// Position channels need a column with an ordering scale. Color accepts
    /// anything but the raw domains list, which is redirected to the primary
    /// domain. The selection is unchanged on error.
    pub fn set(&mut self, channel: Channel, column: Column) -> Result<()> {
        match channel {
            Channel::X | Channel::Y if !column.tag().has_ordering_scale() => {
                Err(StoryError::InvalidSelection {
                    channel: channel.to_string(),
                    column: column.label().to_string(),
                })
            }
            Channel::X => {
                self.x = column;
                Ok(())
            }
            Channel::Y => {
                self.y = column;
                Ok(())
            }
            Channel::Color => {
                self.color = match column {
                    Column::Domains => Column::PrimaryDomain,
                    other => other,
                };
                Ok(())
            }
        }
    }

    /// Resolve a column name and assign it.
    pub fn set_by_name(&mut self, channel: Channel, name: &str) -> Result<()> {
        let column = Column::from_name(name)?;
        self.set(channel, column)
    }
}
