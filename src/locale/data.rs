//! Bundled locale tables.
//!
//! Names, shortcuts, phrase tables, and national holiday rule sets for
//! the ten shipped locales. Everything here goes through the public
//! registration path, so a locale built by a plugin has exactly the same
//! capabilities as a bundled one.

use rustc_hash::FxHashMap;

use crate::holiday::{HolidayRule, LunarCalendarKind, ObservedRule, ShiftDirection};
use crate::options::DateOrder;

use super::{CalendarPhrases, Locale, RelativePhrases, RelativeSlot, RelativeThresholds};

pub(crate) const DEFAULT_LOCALE: &str = "en-US";

/// Every bundled locale.
pub(crate) fn builtin_locales() -> Vec<Locale> {
    vec![
        en_us(),
        de_de(),
        fr_fr(),
        es_es(),
        it_it(),
        pt_br(),
        ru_ru(),
        zh_cn(),
        ja_jp(),
        tr_tr(),
    ]
}

fn names<const N: usize>(table: [&str; N]) -> [String; N] {
    table.map(String::from)
}

fn shortcuts(table: &[(&str, &str)]) -> Vec<(String, String)> {
    table
        .iter()
        .map(|(token, expansion)| (String::from(*token), String::from(*expansion)))
        .collect()
}

fn phrases(table: [&str; 13]) -> RelativePhrases {
    let [future, past, few_seconds, minute, minutes, hour, hours, day, days, month, months, year, years] =
        table.map(String::from);
    RelativePhrases {
        future,
        past,
        few_seconds,
        minute,
        minutes,
        hour,
        hours,
        day,
        days,
        month,
        months,
        year,
        years,
    }
}

fn calendar(table: [&str; 6]) -> CalendarPhrases {
    let [same_day, next_day, next_week, last_day, last_week, same_else] = table.map(String::from);
    CalendarPhrases {
        same_day,
        next_day,
        next_week,
        last_day,
        last_week,
        day_after_tomorrow: None,
        day_before_yesterday: None,
        same_else,
    }
}

// ==== Ordinal and meridiem functions ====

fn ordinal_english(n: u16) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn ordinal_dot(n: u16) -> String {
    format!("{n}.")
}

fn ordinal_french(n: u16) -> String {
    if n == 1 {
        String::from("1er")
    } else {
        n.to_string()
    }
}

fn ordinal_masculine(n: u16) -> String {
    format!("{n}º")
}

fn ordinal_plain(n: u16) -> String {
    n.to_string()
}

fn ordinal_cjk_day(n: u16) -> String {
    format!("{n}日")
}

fn meridiem_english(hour: u8, _minute: u8, lowercase: bool) -> String {
    let label = if hour < 12 { "AM" } else { "PM" };
    if lowercase {
        label.to_lowercase()
    } else {
        label.to_string()
    }
}

fn meridiem_chinese(hour: u8, minute: u8, _lowercase: bool) -> String {
    let minutes = u16::from(hour) * 60 + u16::from(minute);
    String::from(match minutes {
        0..=359 => "凌晨",
        360..=539 => "早上",
        540..=719 => "上午",
        720..=779 => "中午",
        780..=1079 => "下午",
        _ => "晚上",
    })
}

fn meridiem_japanese(hour: u8, _minute: u8, _lowercase: bool) -> String {
    String::from(if hour < 12 { "午前" } else { "午後" })
}

// ==== Slavic plural selection ====

fn russian_plural(n: i64, forms: [&str; 3]) -> String {
    let n = n.abs();
    let form = if n % 10 == 1 && n % 100 != 11 {
        forms[0]
    } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
        forms[1]
    } else {
        forms[2]
    };
    format!("{n} {form}")
}

fn russian_relative_count(slot: RelativeSlot, n: i64) -> String {
    match slot {
        RelativeSlot::Minutes => russian_plural(n, ["минуту", "минуты", "минут"]),
        RelativeSlot::Hours => russian_plural(n, ["час", "часа", "часов"]),
        RelativeSlot::Days => russian_plural(n, ["день", "дня", "дней"]),
        RelativeSlot::Months => russian_plural(n, ["месяц", "месяца", "месяцев"]),
        RelativeSlot::Years => russian_plural(n, ["год", "года", "лет"]),
    }
}

// ==== Holiday rule sets ====

fn us_federal_holidays() -> Vec<HolidayRule> {
    let nearest = || ObservedRule::nearest_weekday();
    vec![
        HolidayRule::fixed("New Year's Day", 1, 1).with_observed(nearest()),
        HolidayRule::nth_weekday("Martin Luther King Jr. Day", 1, 1, 3),
        HolidayRule::nth_weekday("Presidents' Day", 2, 1, 3),
        HolidayRule::nth_weekday("Memorial Day", 5, 1, -1),
        HolidayRule::fixed("Juneteenth", 6, 19).with_observed(nearest()),
        HolidayRule::fixed("Independence Day", 7, 4).with_observed(nearest()),
        HolidayRule::nth_weekday("Labor Day", 9, 1, 1),
        HolidayRule::nth_weekday("Columbus Day", 10, 1, 2),
        HolidayRule::fixed("Veterans Day", 11, 11).with_observed(nearest()),
        HolidayRule::nth_weekday("Thanksgiving", 11, 4, 4).with_id("thanksgiving"),
        HolidayRule::fixed("Christmas Day", 12, 25).with_observed(nearest()),
    ]
}

fn german_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Neujahr", 1, 1),
        HolidayRule::easter_based("Karfreitag", -2),
        HolidayRule::easter_based("Ostermontag", 1),
        HolidayRule::fixed("Tag der Arbeit", 5, 1),
        HolidayRule::easter_based("Christi Himmelfahrt", 39),
        HolidayRule::easter_based("Pfingstmontag", 50),
        HolidayRule::fixed("Tag der Deutschen Einheit", 10, 3),
        HolidayRule::fixed("1. Weihnachtstag", 12, 25),
        HolidayRule::fixed("2. Weihnachtstag", 12, 26),
    ]
}

fn german_regional_holidays() -> FxHashMap<String, Vec<HolidayRule>> {
    let mut regional = FxHashMap::default();
    regional.insert(
        String::from("by"),
        vec![
            HolidayRule::fixed("Heilige Drei Könige", 1, 6).with_regions(["BY"]),
            HolidayRule::easter_based("Fronleichnam", 60).with_regions(["BY"]),
            HolidayRule::fixed("Allerheiligen", 11, 1).with_regions(["BY"]),
        ],
    );
    regional.insert(
        String::from("bw"),
        vec![
            HolidayRule::fixed("Heilige Drei Könige (BW)", 1, 6).with_regions(["BW"]),
            HolidayRule::easter_based("Fronleichnam (BW)", 60).with_regions(["BW"]),
        ],
    );
    regional
}

fn french_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Jour de l'an", 1, 1),
        HolidayRule::easter_based("Lundi de Pâques", 1),
        HolidayRule::fixed("Fête du Travail", 5, 1),
        HolidayRule::fixed("Victoire 1945", 5, 8),
        HolidayRule::easter_based("Ascension", 39),
        HolidayRule::easter_based("Lundi de Pentecôte", 50),
        HolidayRule::fixed("Fête nationale", 7, 14),
        HolidayRule::fixed("Assomption", 8, 15),
        HolidayRule::fixed("Toussaint", 11, 1),
        HolidayRule::fixed("Armistice 1918", 11, 11),
        HolidayRule::fixed("Noël", 12, 25),
    ]
}

fn spanish_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Año Nuevo", 1, 1),
        HolidayRule::fixed("Epifanía del Señor", 1, 6),
        HolidayRule::easter_based("Viernes Santo", -2),
        HolidayRule::fixed("Fiesta del Trabajo", 5, 1),
        HolidayRule::fixed("Asunción de la Virgen", 8, 15),
        HolidayRule::fixed("Fiesta Nacional de España", 10, 12),
        HolidayRule::fixed("Todos los Santos", 11, 1),
        HolidayRule::fixed("Día de la Constitución", 12, 6),
        HolidayRule::fixed("Inmaculada Concepción", 12, 8),
        HolidayRule::fixed("Navidad", 12, 25),
    ]
}

fn italian_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Capodanno", 1, 1),
        HolidayRule::fixed("Epifania", 1, 6),
        HolidayRule::easter_based("Lunedì dell'Angelo", 1),
        HolidayRule::fixed("Festa della Liberazione", 4, 25),
        HolidayRule::fixed("Festa del Lavoro", 5, 1),
        HolidayRule::fixed("Festa della Repubblica", 6, 2),
        HolidayRule::fixed("Ferragosto", 8, 15),
        HolidayRule::fixed("Ognissanti", 11, 1),
        HolidayRule::fixed("Immacolata Concezione", 12, 8),
        HolidayRule::fixed("Natale", 12, 25),
        HolidayRule::fixed("Santo Stefano", 12, 26),
    ]
}

fn brazilian_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Confraternização Universal", 1, 1),
        HolidayRule::easter_based("Carnaval", -47).with_duration_days(2),
        HolidayRule::easter_based("Sexta-feira Santa", -2),
        HolidayRule::fixed("Tiradentes", 4, 21),
        HolidayRule::fixed("Dia do Trabalho", 5, 1),
        HolidayRule::easter_based("Corpus Christi", 60),
        HolidayRule::fixed("Independência do Brasil", 9, 7),
        HolidayRule::fixed("Nossa Senhora Aparecida", 10, 12),
        HolidayRule::fixed("Finados", 11, 2),
        HolidayRule::fixed("Proclamação da República", 11, 15),
        HolidayRule::fixed("Natal", 12, 25),
    ]
}

fn russian_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Новогодние каникулы", 1, 1).with_duration_days(6),
        HolidayRule::fixed("Рождество Христово", 1, 7),
        HolidayRule::fixed("День защитника Отечества", 2, 23),
        HolidayRule::fixed("Международный женский день", 3, 8),
        HolidayRule::fixed("Праздник Весны и Труда", 5, 1),
        HolidayRule::fixed("День Победы", 5, 9),
        HolidayRule::fixed("День России", 6, 12),
        HolidayRule::fixed("День народного единства", 11, 4),
    ]
}

fn chinese_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("元旦", 1, 1),
        HolidayRule::lunar("春节", LunarCalendarKind::Chinese, 1, 1)
            .with_id("spring-festival")
            .with_duration_days(3),
        HolidayRule::fixed("清明节", 4, 4),
        HolidayRule::fixed("劳动节", 5, 1),
        HolidayRule::lunar("端午节", LunarCalendarKind::Chinese, 5, 5),
        HolidayRule::lunar("中秋节", LunarCalendarKind::Chinese, 8, 15),
        HolidayRule::fixed("国庆节", 10, 1).with_duration_days(3),
    ]
}

fn japanese_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("元日", 1, 1),
        HolidayRule::nth_weekday("成人の日", 1, 1, 2),
        HolidayRule::fixed("建国記念の日", 2, 11),
        HolidayRule::fixed("天皇誕生日", 2, 23),
        HolidayRule::fixed("昭和の日", 4, 29),
        HolidayRule::fixed("憲法記念日", 5, 3),
        HolidayRule::fixed("みどりの日", 5, 4),
        HolidayRule::fixed("こどもの日", 5, 5)
            .with_observed(ObservedRule::substitute(ShiftDirection::Forward).with_weekends([0])),
        HolidayRule::nth_weekday("海の日", 7, 1, 3),
        HolidayRule::fixed("山の日", 8, 11),
        HolidayRule::nth_weekday("敬老の日", 9, 1, 3),
        HolidayRule::nth_weekday("スポーツの日", 10, 1, 2),
        HolidayRule::fixed("文化の日", 11, 3),
        HolidayRule::fixed("勤労感謝の日", 11, 23),
    ]
}

fn turkish_holidays() -> Vec<HolidayRule> {
    vec![
        HolidayRule::fixed("Yılbaşı", 1, 1),
        HolidayRule::fixed("Ulusal Egemenlik ve Çocuk Bayramı", 4, 23),
        HolidayRule::fixed("Emek ve Dayanışma Günü", 5, 1),
        HolidayRule::fixed("Atatürk'ü Anma, Gençlik ve Spor Bayramı", 5, 19),
        HolidayRule::fixed("Demokrasi ve Millî Birlik Günü", 7, 15),
        HolidayRule::fixed("Zafer Bayramı", 8, 30),
        HolidayRule::fixed("Cumhuriyet Bayramı", 10, 29),
        HolidayRule::lunar("Ramazan Bayramı", LunarCalendarKind::Islamic, 10, 1)
            .with_duration_days(3),
        HolidayRule::lunar("Kurban Bayramı", LunarCalendarKind::Islamic, 12, 10)
            .with_duration_days(4),
    ]
}

// ==== Locale definitions ====

fn en_us() -> Locale {
    Locale {
        code: "en-US".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ]),
        months_short: names([
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ]),
        weekdays: names([
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ]),
        weekdays_short: names(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
        weekdays_min: names(["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]),
        week_start: 0,
        date_order: DateOrder::MonthFirst,
        shortcuts: shortcuts(&[
            ("LTS", "h:mm:ss A"),
            ("LT", "h:mm A"),
            ("L", "MM/DD/YYYY"),
            ("LL", "MMMM D, YYYY"),
            ("LLL", "MMMM D, YYYY h:mm A"),
            ("LLLL", "dddd, MMMM D, YYYY h:mm A"),
        ]),
        ordinal: ordinal_english,
        meridiem: meridiem_english,
        relative: phrases([
            "in %s",
            "%s ago",
            "a few seconds",
            "a minute",
            "%d minutes",
            "an hour",
            "%d hours",
            "a day",
            "%d days",
            "a month",
            "%d months",
            "a year",
            "%d years",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar([
            "[Today at] LT",
            "[Tomorrow at] LT",
            "dddd [at] LT",
            "[Yesterday at] LT",
            "[Last] dddd [at] LT",
            "L",
        ]),
        holidays: us_federal_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn de_de() -> Locale {
    let mut calendar_phrases = calendar([
        "[heute um] LT [Uhr]",
        "[morgen um] LT [Uhr]",
        "dddd [um] LT [Uhr]",
        "[gestern um] LT [Uhr]",
        "[letzten] dddd [um] LT [Uhr]",
        "L",
    ]);
    calendar_phrases.day_after_tomorrow = Some(String::from("[übermorgen um] LT [Uhr]"));
    calendar_phrases.day_before_yesterday = Some(String::from("[vorgestern um] LT [Uhr]"));
    Locale {
        code: "de-DE".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ]),
        months_short: names([
            "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.",
            "Nov.", "Dez.",
        ]),
        weekdays: names([
            "Sonntag",
            "Montag",
            "Dienstag",
            "Mittwoch",
            "Donnerstag",
            "Freitag",
            "Samstag",
        ]),
        weekdays_short: names(["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."]),
        weekdays_min: names(["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "DD.MM.YYYY"),
            ("LL", "D. MMMM YYYY"),
            ("LLL", "D. MMMM YYYY HH:mm"),
            ("LLLL", "dddd, D. MMMM YYYY HH:mm"),
        ]),
        ordinal: ordinal_dot,
        meridiem: meridiem_english,
        relative: phrases([
            "in %s",
            "vor %s",
            "ein paar Sekunden",
            "einer Minute",
            "%d Minuten",
            "einer Stunde",
            "%d Stunden",
            "einem Tag",
            "%d Tagen",
            "einem Monat",
            "%d Monaten",
            "einem Jahr",
            "%d Jahren",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar_phrases,
        holidays: german_holidays(),
        regional_holidays: german_regional_holidays(),
    }
}

fn fr_fr() -> Locale {
    Locale {
        code: "fr-FR".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "janvier",
            "février",
            "mars",
            "avril",
            "mai",
            "juin",
            "juillet",
            "août",
            "septembre",
            "octobre",
            "novembre",
            "décembre",
        ]),
        months_short: names([
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ]),
        weekdays: names([
            "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
        ]),
        weekdays_short: names(["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."]),
        weekdays_min: names(["di", "lu", "ma", "me", "je", "ve", "sa"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "DD/MM/YYYY"),
            ("LL", "D MMMM YYYY"),
            ("LLL", "D MMMM YYYY HH:mm"),
            ("LLLL", "dddd D MMMM YYYY HH:mm"),
        ]),
        ordinal: ordinal_french,
        meridiem: meridiem_english,
        relative: phrases([
            "dans %s",
            "il y a %s",
            "quelques secondes",
            "une minute",
            "%d minutes",
            "une heure",
            "%d heures",
            "un jour",
            "%d jours",
            "un mois",
            "%d mois",
            "un an",
            "%d ans",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar([
            "[Aujourd'hui à] LT",
            "[Demain à] LT",
            "dddd [à] LT",
            "[Hier à] LT",
            "dddd [dernier à] LT",
            "L",
        ]),
        holidays: french_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn es_es() -> Locale {
    Locale {
        code: "es-ES".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "enero",
            "febrero",
            "marzo",
            "abril",
            "mayo",
            "junio",
            "julio",
            "agosto",
            "septiembre",
            "octubre",
            "noviembre",
            "diciembre",
        ]),
        months_short: names([
            "ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sep.", "oct.",
            "nov.", "dic.",
        ]),
        weekdays: names([
            "domingo",
            "lunes",
            "martes",
            "miércoles",
            "jueves",
            "viernes",
            "sábado",
        ]),
        weekdays_short: names(["dom.", "lun.", "mar.", "mié.", "jue.", "vie.", "sáb."]),
        weekdays_min: names(["do", "lu", "ma", "mi", "ju", "vi", "sá"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "H:mm:ss"),
            ("LT", "H:mm"),
            ("L", "DD/MM/YYYY"),
            ("LL", "D [de] MMMM [de] YYYY"),
            ("LLL", "D [de] MMMM [de] YYYY H:mm"),
            ("LLLL", "dddd, D [de] MMMM [de] YYYY H:mm"),
        ]),
        ordinal: ordinal_masculine,
        meridiem: meridiem_english,
        relative: phrases([
            "en %s",
            "hace %s",
            "unos segundos",
            "un minuto",
            "%d minutos",
            "una hora",
            "%d horas",
            "un día",
            "%d días",
            "un mes",
            "%d meses",
            "un año",
            "%d años",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar([
            "[hoy a las] LT",
            "[mañana a las] LT",
            "dddd [a las] LT",
            "[ayer a las] LT",
            "[el] dddd [pasado a las] LT",
            "L",
        ]),
        holidays: spanish_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn it_it() -> Locale {
    Locale {
        code: "it-IT".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "gennaio",
            "febbraio",
            "marzo",
            "aprile",
            "maggio",
            "giugno",
            "luglio",
            "agosto",
            "settembre",
            "ottobre",
            "novembre",
            "dicembre",
        ]),
        months_short: names([
            "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
        ]),
        weekdays: names([
            "domenica",
            "lunedì",
            "martedì",
            "mercoledì",
            "giovedì",
            "venerdì",
            "sabato",
        ]),
        weekdays_short: names(["dom", "lun", "mar", "mer", "gio", "ven", "sab"]),
        weekdays_min: names(["do", "lu", "ma", "me", "gi", "ve", "sa"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "DD/MM/YYYY"),
            ("LL", "D MMMM YYYY"),
            ("LLL", "D MMMM YYYY HH:mm"),
            ("LLLL", "dddd D MMMM YYYY HH:mm"),
        ]),
        ordinal: ordinal_masculine,
        meridiem: meridiem_english,
        relative: phrases([
            "tra %s",
            "%s fa",
            "alcuni secondi",
            "un minuto",
            "%d minuti",
            "un'ora",
            "%d ore",
            "un giorno",
            "%d giorni",
            "un mese",
            "%d mesi",
            "un anno",
            "%d anni",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar([
            "[Oggi alle] LT",
            "[Domani alle] LT",
            "dddd [alle] LT",
            "[Ieri alle] LT",
            "[lo scorso] dddd [alle] LT",
            "L",
        ]),
        holidays: italian_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn pt_br() -> Locale {
    Locale {
        code: "pt-BR".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "janeiro",
            "fevereiro",
            "março",
            "abril",
            "maio",
            "junho",
            "julho",
            "agosto",
            "setembro",
            "outubro",
            "novembro",
            "dezembro",
        ]),
        months_short: names([
            "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
        ]),
        weekdays: names([
            "domingo",
            "segunda-feira",
            "terça-feira",
            "quarta-feira",
            "quinta-feira",
            "sexta-feira",
            "sábado",
        ]),
        weekdays_short: names(["dom", "seg", "ter", "qua", "qui", "sex", "sáb"]),
        weekdays_min: names(["Do", "2ª", "3ª", "4ª", "5ª", "6ª", "Sá"]),
        week_start: 0,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "DD/MM/YYYY"),
            ("LL", "D [de] MMMM [de] YYYY"),
            ("LLL", "D [de] MMMM [de] YYYY [às] HH:mm"),
            ("LLLL", "dddd, D [de] MMMM [de] YYYY [às] HH:mm"),
        ]),
        ordinal: ordinal_masculine,
        meridiem: meridiem_english,
        relative: phrases([
            "em %s",
            "há %s",
            "poucos segundos",
            "um minuto",
            "%d minutos",
            "uma hora",
            "%d horas",
            "um dia",
            "%d dias",
            "um mês",
            "%d meses",
            "um ano",
            "%d anos",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar([
            "[Hoje às] LT",
            "[Amanhã às] LT",
            "dddd [às] LT",
            "[Ontem às] LT",
            "dddd [passada às] LT",
            "L",
        ]),
        holidays: brazilian_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn ru_ru() -> Locale {
    let mut calendar_phrases = calendar([
        "[Сегодня в] LT",
        "[Завтра в] LT",
        "dddd [в] LT",
        "[Вчера в] LT",
        "[В прошлый] dddd [в] LT",
        "L",
    ]);
    calendar_phrases.day_after_tomorrow = Some(String::from("[Послезавтра в] LT"));
    calendar_phrases.day_before_yesterday = Some(String::from("[Позавчера в] LT"));
    Locale {
        code: "ru-RU".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "января",
            "февраля",
            "марта",
            "апреля",
            "мая",
            "июня",
            "июля",
            "августа",
            "сентября",
            "октября",
            "ноября",
            "декабря",
        ]),
        months_short: names([
            "янв.", "февр.", "мар.", "апр.", "мая", "июня", "июля", "авг.", "сент.", "окт.",
            "нояб.", "дек.",
        ]),
        weekdays: names([
            "воскресенье",
            "понедельник",
            "вторник",
            "среда",
            "четверг",
            "пятница",
            "суббота",
        ]),
        weekdays_short: names(["вск", "пнд", "втр", "срд", "чтв", "птн", "сбт"]),
        weekdays_min: names(["вс", "пн", "вт", "ср", "чт", "пт", "сб"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "H:mm:ss"),
            ("LT", "H:mm"),
            ("L", "DD.MM.YYYY"),
            ("LL", "D MMMM YYYY [г.]"),
            ("LLL", "D MMMM YYYY [г.], H:mm"),
            ("LLLL", "dddd, D MMMM YYYY [г.], H:mm"),
        ]),
        ordinal: ordinal_plain,
        meridiem: meridiem_english,
        relative: phrases([
            "через %s",
            "%s назад",
            "несколько секунд",
            "минуту",
            "%d минут",
            "час",
            "%d часов",
            "день",
            "%d дней",
            "месяц",
            "%d месяцев",
            "год",
            "%d лет",
        ]),
        relative_count: Some(russian_relative_count),
        thresholds: RelativeThresholds::default(),
        calendar: calendar_phrases,
        holidays: russian_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn zh_cn() -> Locale {
    let mut calendar_phrases = calendar([
        "[今天] LT",
        "[明天] LT",
        "[下]dddd LT",
        "[昨天] LT",
        "[上]dddd LT",
        "L",
    ]);
    calendar_phrases.day_after_tomorrow = Some(String::from("[后天] LT"));
    calendar_phrases.day_before_yesterday = Some(String::from("[前天] LT"));
    Locale {
        code: "zh-CN".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "一月",
            "二月",
            "三月",
            "四月",
            "五月",
            "六月",
            "七月",
            "八月",
            "九月",
            "十月",
            "十一月",
            "十二月",
        ]),
        months_short: names([
            "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
            "12月",
        ]),
        weekdays: names([
            "星期日",
            "星期一",
            "星期二",
            "星期三",
            "星期四",
            "星期五",
            "星期六",
        ]),
        weekdays_short: names(["周日", "周一", "周二", "周三", "周四", "周五", "周六"]),
        weekdays_min: names(["日", "一", "二", "三", "四", "五", "六"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "YYYY/MM/DD"),
            ("LL", "YYYY年M月D日"),
            ("LLL", "YYYY年M月D日 HH:mm"),
            ("LLLL", "YYYY年M月D日 dddd HH:mm"),
        ]),
        ordinal: ordinal_cjk_day,
        meridiem: meridiem_chinese,
        relative: phrases([
            "%s内",
            "%s前",
            "几秒",
            "1 分钟",
            "%d 分钟",
            "1 小时",
            "%d 小时",
            "1 天",
            "%d 天",
            "1 个月",
            "%d 个月",
            "1 年",
            "%d 年",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar_phrases,
        holidays: chinese_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn ja_jp() -> Locale {
    let mut calendar_phrases = calendar([
        "[今日] LT",
        "[明日] LT",
        "dddd LT",
        "[昨日] LT",
        "[前週]dddd LT",
        "L",
    ]);
    calendar_phrases.day_after_tomorrow = Some(String::from("[明後日] LT"));
    calendar_phrases.day_before_yesterday = Some(String::from("[一昨日] LT"));
    Locale {
        code: "ja-JP".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
            "12月",
        ]),
        months_short: names([
            "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
            "12月",
        ]),
        weekdays: names([
            "日曜日",
            "月曜日",
            "火曜日",
            "水曜日",
            "木曜日",
            "金曜日",
            "土曜日",
        ]),
        weekdays_short: names(["日", "月", "火", "水", "木", "金", "土"]),
        weekdays_min: names(["日", "月", "火", "水", "木", "金", "土"]),
        week_start: 0,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "YYYY/MM/DD"),
            ("LL", "YYYY年M月D日"),
            ("LLL", "YYYY年M月D日 HH:mm"),
            ("LLLL", "YYYY年M月D日 dddd HH:mm"),
        ]),
        ordinal: ordinal_cjk_day,
        meridiem: meridiem_japanese,
        relative: phrases([
            "%s後",
            "%s前",
            "数秒",
            "1分",
            "%d分",
            "1時間",
            "%d時間",
            "1日",
            "%d日",
            "1ヶ月",
            "%dヶ月",
            "1年",
            "%d年",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar_phrases,
        holidays: japanese_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

fn tr_tr() -> Locale {
    Locale {
        code: "tr-TR".parse().unwrap_or_else(|_| unreachable!()),
        months: names([
            "Ocak",
            "Şubat",
            "Mart",
            "Nisan",
            "Mayıs",
            "Haziran",
            "Temmuz",
            "Ağustos",
            "Eylül",
            "Ekim",
            "Kasım",
            "Aralık",
        ]),
        months_short: names([
            "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
        ]),
        weekdays: names([
            "Pazar",
            "Pazartesi",
            "Salı",
            "Çarşamba",
            "Perşembe",
            "Cuma",
            "Cumartesi",
        ]),
        weekdays_short: names(["Paz", "Pts", "Sal", "Çar", "Per", "Cum", "Cts"]),
        weekdays_min: names(["Pz", "Pt", "Sa", "Ça", "Pe", "Cu", "Ct"]),
        week_start: 1,
        date_order: DateOrder::DayFirst,
        shortcuts: shortcuts(&[
            ("LTS", "HH:mm:ss"),
            ("LT", "HH:mm"),
            ("L", "DD.MM.YYYY"),
            ("LL", "D MMMM YYYY"),
            ("LLL", "D MMMM YYYY HH:mm"),
            ("LLLL", "dddd, D MMMM YYYY HH:mm"),
        ]),
        ordinal: ordinal_dot,
        meridiem: meridiem_english,
        relative: phrases([
            "%s sonra",
            "%s önce",
            "birkaç saniye",
            "bir dakika",
            "%d dakika",
            "bir saat",
            "%d saat",
            "bir gün",
            "%d gün",
            "bir ay",
            "%d ay",
            "bir yıl",
            "%d yıl",
        ]),
        relative_count: None,
        thresholds: RelativeThresholds::default(),
        calendar: calendar([
            "[bugün saat] LT",
            "[yarın saat] LT",
            "[haftaya] dddd [saat] LT",
            "[dün] LT",
            "[geçen] dddd [saat] LT",
            "L",
        ]),
        holidays: turkish_holidays(),
        regional_holidays: FxHashMap::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_locale_is_complete() {
        for locale in builtin_locales() {
            assert!(locale.months.iter().all(|name| !name.is_empty()));
            assert!(locale.weekdays.iter().all(|name| !name.is_empty()));
            assert!(locale.week_start <= 6, "{}", locale.code);
            assert!(locale.shortcut("L").is_some(), "{}", locale.code);
            assert!(locale.shortcut("LT").is_some(), "{}", locale.code);
            assert!(!locale.holidays.is_empty(), "{}", locale.code);
        }
    }

    #[test]
    fn english_ordinals() {
        assert_eq!(ordinal_english(1), "1st");
        assert_eq!(ordinal_english(2), "2nd");
        assert_eq!(ordinal_english(3), "3rd");
        assert_eq!(ordinal_english(4), "4th");
        assert_eq!(ordinal_english(11), "11th");
        assert_eq!(ordinal_english(12), "12th");
        assert_eq!(ordinal_english(13), "13th");
        assert_eq!(ordinal_english(21), "21st");
        assert_eq!(ordinal_english(101), "101st");
    }

    #[test]
    fn russian_plural_forms() {
        assert_eq!(russian_relative_count(RelativeSlot::Minutes, 1), "1 минуту");
        assert_eq!(russian_relative_count(RelativeSlot::Minutes, 3), "3 минуты");
        assert_eq!(russian_relative_count(RelativeSlot::Minutes, 5), "5 минут");
        assert_eq!(russian_relative_count(RelativeSlot::Minutes, 11), "11 минут");
        assert_eq!(russian_relative_count(RelativeSlot::Minutes, 21), "21 минуту");
        assert_eq!(russian_relative_count(RelativeSlot::Years, 2), "2 года");
        assert_eq!(russian_relative_count(RelativeSlot::Years, 7), "7 лет");
    }

    #[test]
    fn chinese_meridiem_bands() {
        assert_eq!(meridiem_chinese(3, 0, false), "凌晨");
        assert_eq!(meridiem_chinese(8, 30, false), "早上");
        assert_eq!(meridiem_chinese(11, 0, false), "上午");
        assert_eq!(meridiem_chinese(12, 30, false), "中午");
        assert_eq!(meridiem_chinese(15, 0, false), "下午");
        assert_eq!(meridiem_chinese(22, 0, false), "晚上");
    }
}
