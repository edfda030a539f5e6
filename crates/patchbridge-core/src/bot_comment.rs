use crate::error::TrackerError;
use crate::tracker::{IssueTracker, TrackerComment};

/// Return the first comment by `bot_name` that mentions `patch_set`.
///
/// Comments are scanned in the order given, so callers pass them oldest first.
pub fn find_bot_comment<'a>(
    comments: &'a [TrackerComment],
    bot_name: &str,
    patch_set: &str,
) -> Option<&'a TrackerComment> {
    comments
        .iter()
        .find(|comment| comment.author_login == bot_name && comment.body.contains(patch_set))
}

pub fn get_bot_comment<T>(
    tracker: &T,
    issue_number: u64,
    bot_name: &str,
    patch_set: &str,
) -> Result<Option<TrackerComment>, TrackerError>
where
    T: IssueTracker + ?Sized,
{
    let comments = tracker.list_comments(issue_number)?;
    Ok(find_bot_comment(&comments, bot_name, patch_set).cloned())
}
