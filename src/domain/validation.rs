use super::KanbanError;

const PROJECT_TITLE_CHARS: (usize, usize) = (3, 16);
const PROJECT_DESCRIPTION_MAX_CHARS: usize = 1024;
const BOARD_TITLE_CHARS: (usize, usize) = (1, 16);
const CARD_TITLE_CHARS: (usize, usize) = (3, 16);
const CARD_DESCRIPTION_MAX_CHARS: usize = 2048;
const PASSWORD_CHARS: (usize, usize) = (8, 64);
const NICKNAME_MAX_CHARS: usize = 32;

pub fn validate_project(title: &str, description: &str) -> Result<(), KanbanError> {
    check_length("Project title", title, PROJECT_TITLE_CHARS)?;
    check_max("Project description", description, PROJECT_DESCRIPTION_MAX_CHARS)
}

pub fn validate_board_title(title: &str) -> Result<(), KanbanError> {
    check_length("Board title", title, BOARD_TITLE_CHARS)
}

pub fn validate_card_title(title: &str) -> Result<(), KanbanError> {
    check_length("Card title", title, CARD_TITLE_CHARS)
}

pub fn validate_card_description(description: &str) -> Result<(), KanbanError> {
    check_max("Card description", description, CARD_DESCRIPTION_MAX_CHARS)
}

/// Checked locally so an obviously bad form never reaches `POST /users`.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), KanbanError> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(KanbanError::BadRequest(format!("Invalid email address: {email}")));
    }
    check_length("Password", password, PASSWORD_CHARS)
}

pub fn validate_nickname(nickname: &str) -> Result<(), KanbanError> {
    if nickname.trim().is_empty() {
        return Err(KanbanError::BadRequest("Nickname must not be empty".into()));
    }
    check_max("Nickname", nickname, NICKNAME_MAX_CHARS)
}

fn check_length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), KanbanError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(KanbanError::BadRequest(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

fn check_max(field: &str, value: &str, max: usize) -> Result<(), KanbanError> {
    if value.chars().count() > max {
        return Err(KanbanError::BadRequest(format!(
            "{field} must not exceed {max} characters"
        )));
    }
    Ok(())
}
