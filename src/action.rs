/// Site identifier the portal expects on every timeman call.
pub const SITE_ID: &str = "s1";

/// Device label reported with every workday action.
pub const DEVICE: &str = "browser";

/// Label the portal expects in `newActionName` when reopening.
const CONTINUATION_NAME: &str = "continues";

/// Workday state changes the timeman endpoint understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Open,
    Pause,
    Reopen,
    Close,
}

impl Action {
    /// Name the portal uses in the `action` query parameter.
    pub fn wire_name(self) -> &'static str {
        match self {
            Action::Open => "open",
            Action::Pause => "pause",
            Action::Reopen => "reopen",
            Action::Close => "close",
        }
    }

    fn continuation(self) -> Option<&'static str> {
        match self {
            Action::Reopen => Some(CONTINUATION_NAME),
            _ => None,
        }
    }
}

/// One fully-described timeman call: the action plus the fresh sessid token.
///
/// Built by the dispatcher and handed to the session whole, so the query and
/// form contents are fixed before any request exists.
#[derive(Debug)]
pub struct ActionRequest<'a> {
    action: Action,
    sessid: &'a str,
}

impl<'a> ActionRequest<'a> {
    pub fn new(action: Action, sessid: &'a str) -> Self {
        Self { action, sessid }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Query parameters for the timeman endpoint.
    pub fn query(&self) -> Vec<(&'static str, &'a str)> {
        vec![
            ("action", self.action.wire_name()),
            ("site_id", SITE_ID),
            ("sessid", self.sessid),
        ]
    }

    /// Form body pairs; only reopening carries the continuation name.
    pub fn form(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = vec![("device", DEVICE)];
        if let Some(name) = self.action.continuation() {
            pairs.push(("newActionName", name));
        }
        pairs
    }
}
