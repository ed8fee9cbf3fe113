//! Scripted transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Answers requests from a queue of canned responses and records every
/// request it was handed.
pub(crate) struct Scripted {
    responses: RefCell<VecDeque<HttpResponse>>,
    pub seen: RefCell<Vec<HttpRequest>>,
}

impl Scripted {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn push(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(response);
    }

    pub fn request_count(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Transport for Scripted {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
    }
}

pub(crate) fn todo_json(id: &str, title: &str, completed: bool) -> String {
    format!(
        r#"{{"_id":"{id}","title":"{title}","description":"","completed":{completed},"created_at":"2024-05-01T09:30:00","updated_at":"2024-05-01T09:30:00"}}"#
    )
}
