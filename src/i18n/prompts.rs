//! Conversation prompts, re-prompts, and choice labels.

pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    let s = match key {
        // --- Step prompts ---
        "prompt_place" => match lang {
            "Russian" => "Создание новой привычки\n\nВведите место, где будете выполнять привычку:\nНапример: Дома, В парке, На работе",
            _ => "Creating a new habit\n\nWhere will you do it?\nFor example: At home, In the park, At work",
        },
        "prompt_time" => match lang {
            "Russian" => "Введите время выполнения (формат ЧЧ:ММ):\nНапример: 09:00, 18:30",
            _ => "Enter the time (HH:MM, 24-hour):\nFor example: 09:00, 18:30",
        },
        "prompt_action" => match lang {
            "Russian" => "Введите действие (что будете делать):\nНапример: Читать книгу, Делать зарядку, Медитировать",
            _ => "What will you do?\nFor example: Read a book, Do exercises, Meditate",
        },
        "prompt_execution_time" => match lang {
            "Russian" => "Введите время на выполнение в секундах (от 1 до 120):",
            _ => "How many seconds will it take? (1 to 120):",
        },
        "prompt_periodicity" => match lang {
            "Russian" => "Выберите периодичность:",
            _ => "How often?",
        },
        "prompt_day_of_week" => match lang {
            "Russian" => "Выберите день недели:",
            _ => "Which day of the week?",
        },
        "prompt_reward" => match lang {
            "Russian" => "Введите вознаграждение (или 'нет' если не нужно):\nНапример: Чашка кофе, Просмотр сериала, Сладость",
            _ => "What's your reward? (or 'none')\nFor example: A cup of coffee, An episode of a show, Something sweet",
        },
        "confirm_question" => match lang {
            "Russian" => "Все верно? (да/нет)",
            _ => "Is everything correct? (yes/no)",
        },

        // --- Re-prompts ---
        "retry_empty" => match lang {
            "Russian" => "Значение не может быть пустым. Попробуйте еще раз:",
            _ => "This can't be empty. Try again:",
        },
        "retry_too_long" => match lang {
            "Russian" => "Слишком длинный текст. Сократите и попробуйте еще раз:",
            _ => "That's too long. Please shorten it and try again:",
        },
        "retry_time" => match lang {
            "Russian" => "Неверный формат времени. Используйте ЧЧ:ММ\nПопробуйте еще раз:",
            _ => "Invalid time format. Use HH:MM\nTry again:",
        },
        "retry_number" => match lang {
            "Russian" => "Введите число (секунды):",
            _ => "Enter a number (seconds):",
        },
        "retry_range" => match lang {
            "Russian" => "Время выполнения должно быть от 1 до 120 секунд.\nВведите снова:",
            _ => "Execution time must be between 1 and 120 seconds.\nEnter again:",
        },
        "retry_periodicity" => match lang {
            "Russian" => "Выберите один из предложенных вариантов: Ежедневно или Еженедельно.",
            _ => "Please pick one of the offered options: Daily or Weekly.",
        },
        "retry_weekday" => match lang {
            "Russian" => "Выберите день недели с клавиатуры.",
            _ => "Please pick a day of the week from the keyboard.",
        },
        "retry_confirm" => match lang {
            "Russian" => "Ответьте, пожалуйста, да или нет.",
            _ => "Please answer yes or no.",
        },

        // --- Choice labels ---
        "choice_daily" => match lang {
            "Russian" => "Ежедневно",
            _ => "Daily",
        },
        "choice_weekly" => match lang {
            "Russian" => "Еженедельно",
            _ => "Weekly",
        },
        "choice_yes" => match lang {
            "Russian" => "Да",
            _ => "Yes",
        },
        "choice_no" => match lang {
            "Russian" => "Нет",
            _ => "No",
        },

        _ => return None,
    };
    Some(s)
}
