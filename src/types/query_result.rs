/// Result of `RelationalDriver::query`: a success flag plus the models
/// hydrated from the returned rows, in server order.
#[derive(Debug)]
pub struct QueryResult<M> {
    success: bool,
    models: Vec<M>,
    affected_rows: u64,
}

impl<M> QueryResult<M> {
    pub fn new(success: bool) -> Self {
        Self {
            success,
            models: Vec::new(),
            affected_rows: 0,
        }
    }

    pub(crate) fn add(&mut self, model: M) {
        self.models.push(model);
    }

    pub(crate) fn set_affected_rows(&mut self, affected_rows: u64) {
        self.affected_rows = affected_rows;
    }

    /// Whether the statement executed successfully.
    pub fn was_successful(&self) -> bool {
        self.success
    }

    /// Rows changed by an UPDATE or DELETE query.
    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    pub fn get(&self, index: usize) -> Option<&M> {
        self.models.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.models.iter()
    }

    /// Returns the hydrated models.
    pub fn models(self) -> Vec<M> {
        self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl<M> IntoIterator for QueryResult<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a QueryResult<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
