//! Command replies and conversation outcomes.

pub(super) fn lookup(key: &str, lang: &str) -> Option<&'static str> {
    let s = match key {
        "habit_cancelled" => match lang {
            "Russian" => "Создание привычки отменено.",
            _ => "Habit creation cancelled.",
        },
        "nothing_to_cancel" => match lang {
            "Russian" => "Сейчас нечего отменять.",
            _ => "There is nothing to cancel.",
        },
        "not_registered" => match lang {
            "Russian" => "Вы не зарегистрированы. Используйте /start для регистрации.",
            _ => "You are not registered. Use /start to register.",
        },
        "no_habits" => match lang {
            "Russian" => "У вас пока нет привычек. Используйте /create чтобы создать первую!",
            _ => "You have no habits yet. Use /create to create your first one!",
        },
        "no_public_habits" => match lang {
            "Russian" => "Публичных привычек пока нет.",
            _ => "No public habits yet.",
        },
        "your_habits" => match lang {
            "Russian" => "ВАШИ ПРИВЫЧКИ:",
            _ => "YOUR HABITS:",
        },
        "public_habits" => match lang {
            "Russian" => "ПУБЛИЧНЫЕ ПРИВЫЧКИ:",
            _ => "PUBLIC HABITS:",
        },
        "error_generic" => match lang {
            "Russian" => "Произошла ошибка. Попробуйте позже.",
            _ => "Something went wrong. Please try again later.",
        },
        "unknown_command" => match lang {
            "Russian" => "Неизвестная команда. Используйте /help чтобы увидеть список команд.",
            _ => "Unknown command. Use /help to see what I can do.",
        },
        "text_hint" => match lang {
            "Russian" => "Используйте /create чтобы создать привычку или /help для помощи.",
            _ => "Use /create to create a habit or /help for help.",
        },
        "commands_list" => match lang {
            "Russian" => "Доступные команды:\n/create - Создать привычку\n/myhabits - Мои привычки\n/public - Публичные привычки\n/help - Помощь",
            _ => "Available commands:\n/create - Create a habit\n/myhabits - My habits\n/public - Public habits\n/help - Help",
        },
        "help" => match lang {
            "Russian" => "HABIT TRACKER BOT - ПОМОЩЬ\n\n\
                Доступные команды:\n\
                /start - Начать работу и зарегистрироваться\n\
                /create - Создать новую привычку\n\
                /myhabits - Показать мои привычки\n\
                /public - Показать публичные привычки\n\
                /cancel - Отменить создание привычки\n\
                /help - Эта справка\n\n\
                Пример создания привычки:\n\
                1. /create\n\
                2. Введите место\n\
                3. Введите время (ЧЧ:ММ)\n\
                4. Введите действие\n\
                5. Укажите длительность в секундах\n\
                6. Выберите периодичность\n\
                7. Укажите вознаграждение\n\n\
                Бот будет отправлять напоминания!",
            _ => "HABIT TRACKER BOT - HELP\n\n\
                Available commands:\n\
                /start - Get started and register\n\
                /create - Create a new habit\n\
                /myhabits - Show my habits\n\
                /public - Show public habits\n\
                /cancel - Cancel habit creation\n\
                /help - This help\n\n\
                Creating a habit:\n\
                1. /create\n\
                2. Enter the place\n\
                3. Enter the time (HH:MM)\n\
                4. Enter the action\n\
                5. Enter the duration in seconds\n\
                6. Choose how often\n\
                7. Name your reward\n\n\
                The bot will send you reminders!",
        },
        "none_label" => match lang {
            "Russian" => "нет",
            _ => "none",
        },
        "daily_label" => match lang {
            "Russian" => "ежедневно",
            _ => "daily",
        },
        "weekly_label" => match lang {
            "Russian" => "еженедельно",
            _ => "weekly",
        },
        _ => return None,
    };
    Some(s)
}
