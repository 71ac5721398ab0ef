/// The authenticated caller of a public endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
}

impl Requester {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
