use super::repo::PrNumber;

/// The two text fields of the generation form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub repo: String,
    pub pr: String,
}

impl FormInput {
    pub fn new(repo: impl Into<String>, pr: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            pr: pr.into(),
        }
    }

    /// The `(repo_url, pr_number)` pair to submit, or `None` when the
    /// repository is blank or the PR field is not a positive integer.
    pub fn submission(&self) -> Option<(String, PrNumber)> {
        let repo = self.repo.trim();
        if repo.is_empty() {
            return None;
        }
        let pr = PrNumber::parse(&self.pr)?;
        Some((repo.to_owned(), pr))
    }

    pub fn clear(&mut self) {
        self.repo.clear();
        self.pr.clear();
    }
}
