use anyhow::{anyhow, Result};

/// Longest display name a person can be registered under.
pub const MAX_NAME_LENGTH: usize = 32;
/// Longest custom message that can ride along with a nudge.
pub const MAX_CUSTOM_MESSAGE_LENGTH: usize = 500;

/// Names are used as command arguments, so they must be a single word.
pub fn validate_person_name(name: &str) -> Result<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Name cannot be empty"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(anyhow!("Name cannot be longer than {} characters", MAX_NAME_LENGTH));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(anyhow!("Name cannot contain spaces"));
    }

    if name.eq_ignore_ascii_case("all") {
        return Err(anyhow!("'all' is reserved for waking everyone"));
    }

    Ok(())
}

pub fn validate_target_name(name: &str) -> Result<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Tell me who to wake"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(anyhow!("Name cannot be longer than {} characters", MAX_NAME_LENGTH));
    }

    Ok(())
}

pub fn validate_custom_message(message: &str) -> Result<()> {
    if message.chars().count() > MAX_CUSTOM_MESSAGE_LENGTH {
        return Err(anyhow!(
            "Message cannot be longer than {} characters",
            MAX_CUSTOM_MESSAGE_LENGTH
        ));
    }

    Ok(())
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    // Telegram chat IDs should be non-zero
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // Positive IDs are user chats. User IDs go up to 52 bits.
    if chat_id > (1i64 << 52) {
        return Err(anyhow!("Invalid user chat ID range"));
    }

    // Supergroups and channels sit around -100xxxxxxxxxx
    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

/// Parses a stored or typed chat identifier into Telegram's numeric form.
pub fn parse_chat_id(raw: &str) -> Result<i64> {
    let chat_id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("Chat ID '{}' is not a number", raw.trim()))?;
    validate_telegram_chat_id(chat_id)?;
    Ok(chat_id)
}
