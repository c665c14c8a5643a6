//! Message texts

pub const MSG_ENTER_STUDENT_ID: &str = "لطفاً شماره‌ی دانشجویی‌ات را وارد کن:";
pub const MSG_ENTER_PASSWORD: &str = "حالا رمز عبور سامانه‌ی تغذیه را وارد کن:";
pub const MSG_PROFILE_SUCCESS: &str = "اطلاعاتت با موفقیت ذخیره شد! 🎉";
pub const MSG_WELCOME: &str = "سلام! برای دیدن منوی غذا از دکمه‌های پایین استفاده کن.";
pub const MSG_RESERVE_UNAVAILABLE: &str = "فعلا از این چیزها نداریم!";
pub const MSG_CREDIT_UNAVAILABLE: &str = "مشاهده‌ی اعتبار هنوز آماده نیست.";
pub const MSG_AN_ERROR_OCCURRED: &str = "متأسفانه مشکلی پیش آمد. لطفاً دوباره از اول شروع کن.";
pub const MSG_UNKNOWN: &str = "متوجه نشدم! از دکمه‌های پایین استفاده کن.";
pub const MSG_CANCELLED: &str = "لغو شد.";
pub const MSG_NOTHING_TO_CANCEL: &str = "کاری برای لغو کردن وجود ندارد.";
pub const MSG_SESSION_EXPIRED: &str = "مدت زیادی گذشت و گفت‌وگو لغو شد. لطفاً دوباره شروع کن.";
pub const MSG_MENU_EMPTY: &str = "فعلاً غذایی در منو نیست.";
pub const MSG_NO_SIDE_DISH: &str = "بدون مخلفات";

pub const MAIN_KEYBOARD_MENU: &str = "🍽 منو";
pub const MAIN_KEYBOARD_CREDIT: &str = "💰 اعتبار";

/// Status markers that open each menu line
pub const UNAVAILABLE_MARK: &str = "🚫";
pub const RESERVED_MARK: &str = "✅";
pub const SELECTABLE_MARK: &str = "⬜️";

/// Fields interpolated into a menu line
pub struct FoodLine<'a> {
    pub meal_time: &'a str,
    pub day: &'a str,
    pub name: &'a str,
    pub side_dish: &'a str,
    pub price: i64,
}

/// Menu line for a food that can no longer be picked
pub fn not_selectable_food_item(line: &FoodLine<'_>) -> String {
    food_item(UNAVAILABLE_MARK, line)
}

/// Menu line for a food the user has reserved
pub fn selected_food_item(line: &FoodLine<'_>) -> String {
    food_item(RESERVED_MARK, line)
}

/// Menu line for a food the user may still pick
pub fn not_selected_food_item(line: &FoodLine<'_>) -> String {
    food_item(SELECTABLE_MARK, line)
}

fn food_item(mark: &str, line: &FoodLine<'_>) -> String {
    format!(
        "{mark} {} {}\n{} با {}\n{} تومان\n\n",
        line.meal_time, line.day, line.name, line.side_dish, line.price
    )
}

/// Caption of an inline food button
pub fn keyboard_food_item(weekday: &str, name: &str) -> String {
    format!("{weekday} - {name}")
}
