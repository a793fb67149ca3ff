//! Resumable pagination cursors.
//!
//! The directory only understands page numbers, so listings carry an opaque
//! cursor built from a stack of page states ("bag"). Each nesting level of a
//! listing owns one frame; finishing an inner listing pops back to the outer
//! frame instead of overwriting it.

use serde::{Deserialize, Serialize};

use crate::error::CursorError;
use crate::types::ResourceKind;

/// Page size requested from the directory when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One frame of the cursor stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageState {
    /// Raw page token; empty means first page.
    #[serde(default)]
    pub token: String,
    pub resource_type_id: String,
    /// Parent resource the listing is scoped to, empty for top-level listings.
    #[serde(default)]
    pub resource_id: String,
}

impl PageState {
    pub fn new(resource_type: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self {
            token: String::new(),
            resource_type_id: resource_type.as_str().to_string(),
            resource_id: resource_id.into(),
        }
    }
}

/// Stack of page states, serialized as the opaque cursor string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bag {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    states: Vec<PageState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_state: Option<PageState>,
}

impl Bag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a serialized cursor. The empty string is the empty bag.
    pub fn unmarshal(token: &str) -> Result<Self, CursorError> {
        if token.is_empty() {
            return Ok(Self::new());
        }

        let bag: Bag = serde_json::from_str(token).map_err(|e| CursorError::Malformed {
            message: e.to_string(),
        })?;

        if bag.current_state.is_none() && !bag.states.is_empty() {
            return Err(CursorError::Malformed {
                message: "parent frames without a current frame".to_string(),
            });
        }

        let frames = bag.states.iter().chain(bag.current_state.iter());
        for frame in frames {
            if frame.resource_type_id.is_empty() {
                return Err(CursorError::Malformed {
                    message: "frame without resource type".to_string(),
                });
            }
        }

        Ok(bag)
    }

    /// Encode the bag. The empty bag encodes to the empty string.
    pub fn marshal(&self) -> Result<String, CursorError> {
        if self.is_empty() {
            return Ok(String::new());
        }

        serde_json::to_string(self).map_err(|e| CursorError::Malformed {
            message: e.to_string(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_state.is_none() && self.states.is_empty()
    }

    /// Number of frames, including the current one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.states.len() + usize::from(self.current_state.is_some())
    }

    #[must_use]
    pub fn current(&self) -> Option<&PageState> {
        self.current_state.as_ref()
    }

    /// Token of the current frame, empty when there is none.
    #[must_use]
    pub fn page_token(&self) -> &str {
        self.current_state
            .as_ref()
            .map_or("", |state| state.token.as_str())
    }

    /// Make `state` the current frame, keeping the previous one as its parent.
    pub fn push(&mut self, state: PageState) {
        if let Some(current) = self.current_state.take() {
            self.states.push(current);
        }
        self.current_state = Some(state);
    }

    /// Start listing `resource_type` inside `resource_id`.
    ///
    /// Pushes a frame unless the current frame already is that listing.
    pub fn enter(&mut self, resource_type: ResourceKind, resource_id: &str) {
        let already_current = self.current_state.as_ref().is_some_and(|state| {
            state.resource_type_id == resource_type.as_str() && state.resource_id == resource_id
        });
        if !already_current {
            self.push(PageState::new(resource_type, resource_id));
        }
    }

    /// Drop the current frame and resume the parent one.
    pub fn pop(&mut self) -> Option<PageState> {
        let popped = self.current_state.take();
        self.current_state = self.states.pop();
        popped
    }

    /// Record the next page token and serialize the bag.
    ///
    /// An empty token finishes the current frame: the result is the parent
    /// frame's cursor, or the empty (terminal) cursor at the top level.
    pub fn next_token(&mut self, page_token: &str) -> Result<String, CursorError> {
        let Some(state) = self.current_state.as_mut() else {
            return Err(CursorError::NoActiveFrame);
        };

        if page_token.is_empty() {
            self.pop();
        } else {
            state.token = page_token.to_string();
        }

        self.marshal()
    }
}

/// Page to request next for `resource_type`, 1-based.
///
/// No frame, an empty token, or "0" all mean the first page.
pub fn current_page_number(bag: &Bag, resource_type: ResourceKind) -> Result<u32, CursorError> {
    let Some(state) = bag.current() else {
        return Ok(1);
    };

    if state.resource_type_id != resource_type.as_str() {
        return Err(CursorError::ResourceTypeMismatch {
            expected: resource_type.as_str().to_string(),
            found: state.resource_type_id.clone(),
        });
    }

    if state.token.is_empty() {
        return Ok(1);
    }

    let invalid = || CursorError::InvalidPageToken {
        token: state.token.clone(),
        resource_type: resource_type.as_str().to_string(),
    };

    // Plain decimal digits only; `str::parse` would also take a leading '+'.
    if !state.token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let page = state.token.parse::<u32>().map_err(|_| invalid())?;

    Ok(page.max(1))
}

/// Decide the page after `current` from the size of the fetched page.
///
/// The directory reports no totals: a full page means another one may
/// follow, a short or empty page is the last. Returns 0 to stop.
#[must_use]
pub fn next_page(current: u32, page_size: u32, fetched: usize) -> u32 {
    if page_size > 0 && fetched == page_size as usize {
        current.checked_add(1).unwrap_or(0)
    } else {
        0
    }
}

/// Cursor state for one page of one listing.
#[derive(Debug, Clone)]
pub struct PageCursor {
    bag: Bag,
    page: u32,
}

impl PageCursor {
    /// Decode `token` for a listing of `resource_type`, scoped to
    /// `resource_id` when listing inside a parent.
    ///
    /// A frame is pushed when the bag has none yet. A cursor issued for
    /// another parent is rejected.
    pub fn parse(
        token: &str,
        resource_type: ResourceKind,
        resource_id: Option<&str>,
    ) -> Result<Self, CursorError> {
        let scope = resource_id.unwrap_or_default();
        let mut bag = Bag::unmarshal(token)?;
        let page = current_page_number(&bag, resource_type)?;

        if let Some(state) = bag.current() {
            if state.resource_id != scope {
                return Err(CursorError::ResourceTypeMismatch {
                    expected: format!("{resource_type} in '{scope}'"),
                    found: format!("{} in '{}'", state.resource_type_id, state.resource_id),
                });
            }
        }
        bag.enter(resource_type, scope);

        Ok(Self { bag, page })
    }

    /// Page number to request, 1-based.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Serialized cursor for the following call, given how many records the
    /// directory returned for a request of `page_size`. Empty means done.
    pub fn advance(mut self, page_size: u32, fetched: usize) -> Result<String, CursorError> {
        let next = next_page(self.page, page_size, fetched);
        let token = if next == 0 {
            String::new()
        } else {
            next.to_string()
        };

        self.bag.next_token(&token)
    }
}
