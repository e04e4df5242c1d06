//! Competitions page. Tournaments are not live yet; this is the
//! announcement placeholder the nav links to.

use web_sys::Element;

use crate::app::dom;

pub fn render(container: &Element) {
    let page = dom::make("div", "competitions-page");

    let heading = dom::make("h1", "page-title");
    heading.set_text_content(Some("Соревнования"));
    let _ = page.append_child(&heading);

    let card = dom::make("div", "coming-soon-card");

    let title = dom::make("h2", "coming-soon-title");
    title.set_text_content(Some("Скоро!"));
    let _ = card.append_child(&title);

    let blurb = dom::make("p", "coming-soon-blurb");
    blurb.set_text_content(Some(
        "Турниры между игроками появятся в одном из следующих обновлений. \
         А пока поднимайтесь в рейтинге упражнений.",
    ));
    let _ = card.append_child(&blurb);

    let _ = page.append_child(&card);
    let _ = container.append_child(&page);
}
