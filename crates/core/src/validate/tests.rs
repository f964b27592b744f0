use super::*;

#[test]
fn task_names_are_trimmed_and_required() {
    assert_eq!(validate_task_name("  Barrer  "), Ok("Barrer".to_string()));
    assert_eq!(validate_task_name(""), Err(ValidationError::MissingTaskName));
    assert_eq!(validate_task_name(" \t\n"), Err(ValidationError::MissingTaskName));
}

#[test]
fn task_name_length_is_counted_in_chars() {
    let exact = "ñ".repeat(MAX_TASK_NAME_CHARS);
    assert!(validate_task_name(&exact).is_ok());
    let over = "a".repeat(MAX_TASK_NAME_CHARS + 1);
    assert_eq!(validate_task_name(&over), Err(ValidationError::TaskNameTooLong));
}

#[test]
fn category_names_are_trimmed_and_bounded() {
    assert_eq!(validate_category_name(" Hogar "), Ok("Hogar".to_string()));
    assert_eq!(
        validate_category_name(""),
        Err(ValidationError::MissingCategoryName)
    );
    assert_eq!(
        validate_category_name(&"x".repeat(MAX_CATEGORY_NAME_CHARS + 1)),
        Err(ValidationError::CategoryNameTooLong)
    );
}

#[test]
fn estimates_must_be_non_negative_integers() {
    assert_eq!(validate_estimated_minutes(0), Ok(0));
    assert_eq!(
        validate_estimated_minutes(-1),
        Err(ValidationError::NegativeEstimate)
    );
    assert_eq!(parse_estimated_minutes(" 45 "), Ok(Some(45)));
    assert_eq!(parse_estimated_minutes(""), Ok(None));
    assert_eq!(
        parse_estimated_minutes("1.5"),
        Err(ValidationError::NegativeEstimate)
    );
    assert_eq!(
        parse_estimated_minutes("-3"),
        Err(ValidationError::NegativeEstimate)
    );
}

#[test]
fn due_dates_normalize_to_minutes() {
    assert_eq!(
        normalize_due_at("2025-03-09T14:30"),
        Ok(Some("2025-03-09T14:30".to_string()))
    );
    assert_eq!(
        normalize_due_at("2025-03-09 14:30:59"),
        Ok(Some("2025-03-09T14:30".to_string()))
    );
    assert_eq!(
        normalize_due_at("2025-03-09"),
        Ok(Some("2025-03-09T00:00".to_string()))
    );
    assert_eq!(normalize_due_at("   "), Ok(None));
}

#[test]
fn due_dates_reject_garbage() {
    assert!(matches!(
        normalize_due_at("mañana"),
        Err(ValidationError::InvalidDueDate { .. })
    ));
    assert!(normalize_due_at("2025-02-30").is_err());
    assert!(normalize_due_at("2025-13-01T00:00").is_err());
}

#[test]
fn due_strings_from_timestamps_order_chronologically() {
    assert_eq!(due_at_from_ms(0), "1970-01-01T00:00");
    let earlier = due_at_from_ms(1_700_000_000_000);
    let later = due_at_from_ms(1_700_000_060_000);
    assert!(earlier < later);
    assert_eq!(ms_from_due_at(&earlier), Some(1_699_999_980_000));
}

#[test]
fn range_ends_cover_the_whole_day() {
    assert_eq!(
        normalize_due_until("2025-03-09"),
        Ok(Some("2025-03-09T23:59".to_string()))
    );
    assert_eq!(
        normalize_due_until("2025-03-09T08:15"),
        Ok(Some("2025-03-09T08:15".to_string()))
    );
    assert_eq!(normalize_due_until(""), Ok(None));
    assert!(normalize_due_until("viernes").is_err());
}

#[test]
fn weekdays_start_on_monday() {
    // 2024-01-01 was a Monday, the epoch a Thursday.
    assert_eq!(weekday_index_from_ms(1_704_067_200_000), 0);
    assert_eq!(weekday_index_from_ms(1_704_067_200_000 + 6 * 86_400_000), 6);
    assert_eq!(weekday_index_from_ms(0), 3);
}
