//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the effective configuration as a commented TOML document.
    ///
    /// Strings go through `{:?}` so quotes and backslashes come out escaped.
    pub fn to_toml(&self) -> String {
        let gh = &self.github;
        let anim = &self.ui.animations;
        let scroll = &self.ui.scroll;
        let typing = &self.ui.typing;
        let sel = &self.selectors;

        format!(
            r#"# folio configuration

# Theme preference (persisted per user under storage_key)
[theme]
default = {theme_default:?}   # light or dark
storage_key = {theme_key:?}

# Remote repository listing - only used by `folio projects --remote`
[github]
username = {gh_user:?}
base_url = {gh_base:?}
max_repos = {gh_max}
display_limit = {gh_limit}

[ui.animations]
duration_ms = {anim_duration}
easing = {anim_easing:?}
observer_threshold = {anim_threshold:?}
observer_root_margin = {anim_margin:?}
counter_duration_ms = {counter_duration}
counter_tick_ms = {counter_tick}

[ui.scroll]
navbar_threshold = {navbar:?}
back_to_top_threshold = {back_to_top:?}
parallax_speed = {parallax:?}
throttle_ms = {throttle}
section_offset = {section_offset:?}

[ui.typing]
text = {typing_text:?}
speed_ms = {typing_speed}
delay_ms = {typing_delay}

[ui.layout]
mobile_breakpoint = {breakpoint:?}

[ui.notifications]
display_ms = {notice_display}
exit_ms = {notice_exit}

# Contact form (simulated submission)
[contact]
submit_delay_ms = {submit_delay}
failure_rate = {failure_rate:?}
success_message = {success_message:?}
failure_message = {failure_message:?}

[download]
default_filename = {download_name:?}
fallback_delay_ms = {download_delay}

# Page regions
[selectors]
navbar = {s_navbar:?}
hamburger = {s_hamburger:?}
nav_menu = {s_nav_menu:?}
nav_links = {s_nav_links:?}
sections = {s_sections:?}
theme_toggle = {s_theme_toggle:?}
back_to_top = {s_back_to_top:?}
contact_form = {s_contact_form:?}
projects_grid = {s_projects_grid:?}
project_cards = {s_project_cards:?}
tab_buttons = {s_tab_buttons:?}
tab_contents = {s_tab_contents:?}
filter_buttons = {s_filter_buttons:?}
stat_numbers = {s_stat_numbers:?}
skill_bars = {s_skill_bars:?}
typing_text = {s_typing_text:?}
hero = {s_hero:?}
hero_landmark = {s_hero_landmark:?}
download_button = {s_download:?}
animated = {s_animated:?}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = {log_file_rotation:?}  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            theme_default = self.theme.default,
            theme_key = self.theme.storage_key,
            gh_user = gh.username,
            gh_base = gh.base_url,
            gh_max = gh.max_repos,
            gh_limit = gh.display_limit,
            anim_duration = anim.duration_ms,
            anim_easing = anim.easing,
            anim_threshold = anim.observer_threshold,
            anim_margin = anim.observer_root_margin,
            counter_duration = anim.counter_duration_ms,
            counter_tick = anim.counter_tick_ms,
            navbar = scroll.navbar_threshold,
            back_to_top = scroll.back_to_top_threshold,
            parallax = scroll.parallax_speed,
            throttle = scroll.throttle_ms,
            section_offset = scroll.section_offset,
            typing_text = typing.text,
            typing_speed = typing.speed_ms,
            typing_delay = typing.delay_ms,
            breakpoint = self.ui.layout.mobile_breakpoint,
            notice_display = self.ui.notifications.display_ms,
            notice_exit = self.ui.notifications.exit_ms,
            submit_delay = self.contact.submit_delay_ms,
            failure_rate = self.contact.failure_rate,
            success_message = self.contact.success_message,
            failure_message = self.contact.failure_message,
            download_name = self.download.default_filename,
            download_delay = self.download.fallback_delay_ms,
            s_navbar = sel.navbar,
            s_hamburger = sel.hamburger,
            s_nav_menu = sel.nav_menu,
            s_nav_links = sel.nav_links,
            s_sections = sel.sections,
            s_theme_toggle = sel.theme_toggle,
            s_back_to_top = sel.back_to_top,
            s_contact_form = sel.contact_form,
            s_projects_grid = sel.projects_grid,
            s_project_cards = sel.project_cards,
            s_tab_buttons = sel.tab_buttons,
            s_tab_contents = sel.tab_contents,
            s_filter_buttons = sel.filter_buttons,
            s_stat_numbers = sel.stat_numbers,
            s_skill_bars = sel.skill_bars,
            s_typing_text = sel.typing_text,
            s_hero = sel.hero,
            s_hero_landmark = sel.hero_landmark,
            s_download = sel.download_button,
            s_animated = sel.animated,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
