// Story themes - the fixed catalog children pick from when starting a story.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Suggested characters shown on the picker
    pub characters: &'static str,
    pub plot_hints: &'static str,
}

const THEMES: &[Theme] = &[
    Theme {
        id: "fantastik",
        name: "Fantastik",
        description: "Büyülü dünyalar, sihirli yaratıklar ve olağanüstü maceralar",
        icon: "🧙‍♂️",
        color: "#8B5CF6",
        characters: "Sihirbaz, Ejderha, Peri, Büyülü Hayvanlar",
        plot_hints: "Kayıp bir büyü kitabı, gizli bir orman, unutulmuş bir krallık",
    },
    Theme {
        id: "gizem",
        name: "Gizem",
        description: "Gizemli olaylar, ipuçları ve heyecan verici keşifler",
        icon: "🔍",
        color: "#3B82F6",
        characters: "Dedektif, Gizemli Yabancı, Şüpheli Karakterler",
        plot_hints: "Kayıp bir hazine haritası, gizli geçitler, şifreli mesajlar",
    },
    Theme {
        id: "bilim-kurgu",
        name: "Bilim Kurgu",
        description: "Gelecekteki teknolojiler, uzay yolculukları ve robotlar",
        icon: "🚀",
        color: "#06B6D4",
        characters: "Astronot, Robot, Uzaylı, Bilim İnsanı",
        plot_hints: "Yeni bir gezegen keşfi, zaman makinesi, yapay zeka",
    },
    Theme {
        id: "macera",
        name: "Macera",
        description: "Tehlikeli yolculuklar, cesur kahramanlar ve büyük zorluklar",
        icon: "🗺️",
        color: "#10B981",
        characters: "Kaşif, Savaşçı, Rehber, Yerli Halk",
        plot_hints: "Bilinmeyen bir ada, antik tapınak, tehlikeli orman",
    },
    Theme {
        id: "sifir-atik",
        name: "Sıfır Atık",
        description: "Çevre dostu yaşam, geri dönüşüm ve doğa sevgisi",
        icon: "♻️",
        color: "#059669",
        characters: "Çevreci Çocuk, Geri Dönüşüm Ustası, Doğa Koruyucusu",
        plot_hints: "Çöplerden yapılan sanat, organik bahçe, temiz enerji",
    },
    Theme {
        id: "iklim-degisikligi",
        name: "İklim Değişikliği",
        description: "İklim sorunları, çözümler ve gelecek için umut",
        icon: "🌍",
        color: "#0D9488",
        characters: "İklim Aktivisti, Bilim İnsanı, Gelecek Çocuğu",
        plot_hints: "Yenilenebilir enerji, karbon ayak izi, yeşil teknoloji",
    },
];

pub fn all() -> &'static [Theme] {
    THEMES
}

pub fn find(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<&str> = all().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("gizem").map(|t| t.name), Some("Gizem"));
        assert!(find("korku").is_none());
    }
}
