//! Fixed reply sent to every newly discovered comment.

pub fn render_reply(author: &str, comment: &str) -> String {
    format!("Hi, {author}!\nThanks for your comment, {comment}\nWe appreciate your engagement!\n")
}
