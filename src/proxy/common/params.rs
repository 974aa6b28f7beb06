// Inbound query parameters

/// Reserved query parameter carrying a client-side GitLab token
pub const CLIENT_TOKEN_PARAM: &str = "private_token";

/// Query parameters of an inbound request.
///
/// Repeated keys collapse to their first value; order of first appearance is kept
/// so the upstream query string is stable across identical requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            if !params.iter().any(|(k, _)| *k == key) {
                params.push((key, value));
            }
        }
        Self(params)
    }

    /// Remove `key`, returning its value
    pub fn take(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    /// Remove the client-side token so it is never forwarded upstream
    pub fn take_client_token(&mut self) -> Option<String> {
        self.take(CLIENT_TOKEN_PARAM)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
