pub mod highlight;
pub mod hover;

pub const HEADER_MOUNT: &str = "header-index";
pub const FOOTER_MOUNT: &str = "footer-index";
pub const MENU_ID: &str = "menu-principal";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub href: &'static str,
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        id: "menu-princ-2",
        label: "Clínicas",
        href: "clinicas.html",
    },
    MenuEntry {
        id: "menu-princ-3",
        label: "Ratings",
        href: "ratings.html",
    },
    MenuEntry {
        id: "menu-princ-4",
        label: "Usuarios",
        href: "usuarios.html",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocialLink {
    pub href: &'static str,
    pub icon: &'static str,
}

pub const SOCIAL_LINKS: &[SocialLink] = &[
    SocialLink {
        href: "https://www.twitter.com",
        icon: "fa-twitter",
    },
    SocialLink {
        href: "https://www.facebook.com",
        icon: "fa-facebook",
    },
    SocialLink {
        href: "https://www.instagram.com",
        icon: "fa-instagram",
    },
    SocialLink {
        href: "https://www.linkedin.com",
        icon: "fa-linkedin",
    },
];

/// Site header and footer shared by every admin page.
#[derive(Clone, Debug)]
pub struct Chrome {
    pub site_name: String,
    pub header_tagline: String,
    pub footer_tagline: String,
    pub copyright: String,
    pub menu: Vec<MenuEntry>,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            site_name: "Elegir Clínica".to_string(),
            header_tagline: "Panel de control".to_string(),
            footer_tagline:
                "Ranking de centros médicos de Buenos Aires, elaborado por sus pacientes"
                    .to_string(),
            copyright: "Copyright © 2023 Venture Design".to_string(),
            menu: MENU.to_vec(),
        }
    }
}

impl Chrome {
    pub fn menu_hrefs(&self) -> Vec<&str> {
        self.menu.iter().map(|m| m.href).collect()
    }

    /// Renders the header. `location` is the current page URL; the matching
    /// menu entry gets the current-page class.
    pub fn render_header(&self, location: Option<&str>) -> String {
        let current = location.and_then(|loc| highlight::current_link(&self.menu_hrefs(), loc));
        let site = escape_html(&self.site_name);

        let mut out = String::new();
        out.push_str("<div class=\"branding-sitio upper\">\n");
        out.push_str(&format!(
            "  <a href=\"index.html\" rel=\"home\" title=\"{site}\">\n    <div><img src=\"svg/isologo.svg\" height=\"50\" alt=\"{site} Logo\"></div>\n  </a>\n"
        ));
        out.push_str("  <div class=\"descripcion-container\">\n");
        out.push_str(&format!(
            "    <h4 class=\"descripcion-sitio\">{}</h4>\n",
            escape_html(&self.header_tagline)
        ));
        out.push_str("  </div>\n</div>\n");

        out.push_str(&format!(
            "<div aria-hidden=\"true\" id=\"{MENU_ID}\" class=\"menu nav-menu\">\n"
        ));
        for (idx, entry) in self.menu.iter().enumerate() {
            let class = if current == Some(idx) {
                format!("menu-item {}", highlight::CURRENT_CLASS)
            } else {
                "menu-item".to_string()
            };
            out.push_str(&format!(
                "  <a href=\"{}\" id=\"{}\" class=\"{}\">{}</a>\n",
                escape_html(entry.href),
                escape_html(entry.id),
                class,
                escape_html(entry.label)
            ));
        }
        out.push_str("  <a href=\"javascript:void(0);\" id=\"menu-hamburg\" class=\"hamburguesa\" onclick=\"abrirMenu()\">\n    <i class=\"fa fa-bars\"></i>\n  </a>\n");
        out.push_str("</div>\n");
        out
    }

    pub fn render_footer(&self) -> String {
        let site = escape_html(&self.site_name);
        let mut out = String::new();
        out.push_str("<div class=\"branding-sitio lower\">\n");
        out.push_str(&format!(
            "  <div class=\"bottom-logo\"><img src=\"svg/logo.svg\" height=\"50\" alt=\"{site} Logo\"></div>\n"
        ));
        out.push_str("  <div class=\"info-sitio\">\n    <ul>\n");
        out.push_str(&format!("      <li>{site}</li>\n"));
        out.push_str(&format!(
            "      <li>{}</li>\n",
            escape_html(&self.footer_tagline)
        ));
        out.push_str("    </ul>\n  </div>\n</div>\n");

        out.push_str("<div class=\"redes\">\n");
        for link in SOCIAL_LINKS {
            out.push_str(&format!(
                "  <a href=\"{}\" target=\"_blank\" class=\"redsoc\">\n    <i aria-hidden=\"true\" class=\"fa {}\"></i>\n  </a>\n",
                link.href, link.icon
            ));
        }
        out.push_str("</div>\n");
        out.push_str(&format!(
            "<div class=\"copyright\">\n  <p>{}</p>\n</div>\n",
            escape_html(&self.copyright)
        ));
        out
    }
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
