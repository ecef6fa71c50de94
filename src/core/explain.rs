//! Keyword classification of places and the per-stop reason shown to the user.
//!
//! A place gets every feature whose keywords occur in its lowercased name and
//! description. The reason prefers a feature that also matches the interest
//! text, then the first feature of the place, then a relevance-based phrase.

use crate::domain::model::{Place, PlaceFeature};

/// 特徵與其關鍵字（字首片段），依此順序輸出
const FEATURE_KEYWORDS: &[(PlaceFeature, &[&str])] = &[
    (
        PlaceFeature::Historical,
        &["истори", "древн", "старин", "кремл", "памятник истории"],
    ),
    (
        PlaceFeature::Cultural,
        &["музей", "галерея", "выставк", "коллекц", "культур", "искусств"],
    ),
    (
        PlaceFeature::Architectural,
        &["архитектур", "здание", "постройка", "дворец", "особняк", "усадьба"],
    ),
    (
        PlaceFeature::Nature,
        &[
            "парк", "сад", "сквер", "природ", "озеро", "река", "набережная", "дендрарий",
            "заповедник",
        ],
    ),
    (
        PlaceFeature::Panoramic,
        &["вид", "панорам", "смотров", "обзор"],
    ),
    (
        PlaceFeature::Religious,
        &[
            "церковь", "собор", "храм", "монастыр", "мечеть", "синагога", "часовня",
            "святое место",
        ],
    ),
    (
        PlaceFeature::Entertainment,
        &["развлечен", "аттракцион", "кинотеатр", "концертный", "аквапарк"],
    ),
    (
        PlaceFeature::Gastronomic,
        &["ресторан", "кафе", "кофейня", "гастрономическ", "кулинарн"],
    ),
    (
        PlaceFeature::Educational,
        &[
            "образовательный центр", "научный центр", "планетарий", "обсерватория",
            "университет", "институт", "библиотека", "лекционный",
        ],
    ),
    (
        PlaceFeature::Shopping,
        &["торговый центр", "торгово-развлекательный", "универмаг", "магазин", "бутик", "рынок", "аркада"],
    ),
    (
        PlaceFeature::Sports,
        &["спортивный комплекс", "стадион", "арена", "физкультурно-оздоровительный"],
    ),
    (
        PlaceFeature::Children,
        &["детский центр", "развивающий центр", "игровая площадка", "детский городок"],
    ),
    (
        PlaceFeature::Romantic,
        &["романтическое место", "место для свиданий", "аллея влюбленных"],
    ),
    (
        PlaceFeature::Technical,
        &["технический музей", "индустриальный памятник", "промышленный комплекс"],
    ),
    (
        PlaceFeature::Military,
        &["военный мемориал", "музей военной техники", "крепость", "форт"],
    ),
    (
        PlaceFeature::Literary,
        &["литературный музей", "дом-музей писателя", "литературное место"],
    ),
    (
        PlaceFeature::Musical,
        &["концертный зал", "филармония", "оперный театр", "музыкальный театр"],
    ),
    (
        PlaceFeature::ContemporaryArt,
        &["центр современного искусства", "арт-пространство", "галерея современного искусства"],
    ),
    (
        PlaceFeature::Unique,
        &["уникальный", "единственный в городе", "особенный", "неповторимый"],
    ),
    (
        PlaceFeature::Family,
        &["семейный отдых", "для всей семьи", "семейный центр"],
    ),
];

/// 興趣文字片段對應的特徵；依序取第一個同時符合的
const INTEREST_KEYWORDS: &[(&str, PlaceFeature)] = &[
    ("истори", PlaceFeature::Historical),
    ("культур", PlaceFeature::Cultural),
    ("музе", PlaceFeature::Cultural),
    ("архитектур", PlaceFeature::Architectural),
    ("природ", PlaceFeature::Nature),
    ("вид", PlaceFeature::Panoramic),
    ("панорам", PlaceFeature::Panoramic),
    ("религи", PlaceFeature::Religious),
    ("развлечен", PlaceFeature::Entertainment),
    ("еда", PlaceFeature::Gastronomic),
    ("кухн", PlaceFeature::Gastronomic),
    ("ресторан", PlaceFeature::Gastronomic),
    ("обучен", PlaceFeature::Educational),
    ("образован", PlaceFeature::Educational),
    ("наук", PlaceFeature::Educational),
    ("шопинг", PlaceFeature::Shopping),
    ("покуп", PlaceFeature::Shopping),
    ("спорт", PlaceFeature::Sports),
    ("фитнес", PlaceFeature::Sports),
    ("детск", PlaceFeature::Children),
    ("ребен", PlaceFeature::Children),
    ("романт", PlaceFeature::Romantic),
    ("любов", PlaceFeature::Romantic),
    ("техн", PlaceFeature::Technical),
    ("индустри", PlaceFeature::Technical),
    ("воен", PlaceFeature::Military),
    ("литератур", PlaceFeature::Literary),
    ("книг", PlaceFeature::Literary),
    ("музык", PlaceFeature::Musical),
    ("современ", PlaceFeature::ContemporaryArt),
    ("арт", PlaceFeature::ContemporaryArt),
    ("уникальн", PlaceFeature::Unique),
    ("необычн", PlaceFeature::Unique),
    ("семей", PlaceFeature::Family),
];

impl PlaceFeature {
    /// 興趣與特徵吻合時的說明
    fn matched_reason(self, place_name: &str) -> String {
        match self {
            PlaceFeature::Historical => format!(
                "идеально соответствует вашему интересу к истории, {} представляет важные исторические объекты",
                place_name
            ),
            PlaceFeature::Cultural => {
                "отвечает вашему запросу о культурных местах, здесь вы найдете интересные выставки и коллекции".to_string()
            }
            PlaceFeature::Architectural => {
                "позволяет оценить архитектурные шедевры, которые вы ищете".to_string()
            }
            PlaceFeature::Nature => {
                "предлагает прекрасные природные ландшафты для отдыха на свежем воздухе".to_string()
            }
            PlaceFeature::Panoramic => {
                "открывает великолепные виды на город, что соответствует вашему желанию увидеть панорамы".to_string()
            }
            PlaceFeature::Religious => {
                "знакомит с духовным наследием и религиозной архитектурой".to_string()
            }
            PlaceFeature::Entertainment => {
                "предлагает разнообразные развлечения для приятного времяпрепровождения".to_string()
            }
            PlaceFeature::Gastronomic => {
                "позволяет насладиться местной кухней и гастрономическими особенностями".to_string()
            }
            PlaceFeature::Educational => {
                "расширяет кругозор и предлагает познавательные программы".to_string()
            }
            PlaceFeature::Shopping => {
                "идеально подходит для шопинга и покупок, которые вас интересуют".to_string()
            }
            PlaceFeature::Sports => {
                "соответствует вашему активному образу жизни и спортивным интересам".to_string()
            }
            PlaceFeature::Children => {
                "создан специально для семей с детьми и предлагает развивающие программы".to_string()
            }
            PlaceFeature::Romantic => {
                "создает особую атмосферу для романтической прогулки".to_string()
            }
            PlaceFeature::Technical => "демонстрирует технические достижения и инновации".to_string(),
            PlaceFeature::Military => "рассказывает о военной истории и героическом прошлом".to_string(),
            PlaceFeature::Literary => {
                "связан с литературным наследием и творчеством известных писателей".to_string()
            }
            PlaceFeature::Musical => "представляет богатую музыкальную культуру и традиции".to_string(),
            PlaceFeature::ContemporaryArt => {
                "отражает актуальные тенденции в современном искусстве".to_string()
            }
            PlaceFeature::Unique => {
                "является уникальной достопримечательностью, которую стоит увидеть".to_string()
            }
            PlaceFeature::Family => {
                "предлагает программы и условия для комфортного семейного отдыха".to_string()
            }
        }
    }

    fn general_reason(self) -> &'static str {
        match self {
            PlaceFeature::Historical => "знакомит с богатой историей и культурным наследием города",
            PlaceFeature::Cultural => "представляет значительный культурный интерес и образовательную ценность",
            PlaceFeature::Architectural => "является выдающимся образцом архитектуры и градостроительства",
            PlaceFeature::Nature => "предлагает возможность отдохнуть в природной среде",
            PlaceFeature::Panoramic => "открывает захватывающие виды на городские ландшафты",
            PlaceFeature::Religious => "отражает духовные традиции и религиозное искусство",
            PlaceFeature::Entertainment => "обеспечивает интересный и разнообразный досуг",
            PlaceFeature::Gastronomic => "позволяет познакомиться с местными кулинарными традициями",
            PlaceFeature::Educational => "способствует получению новых знаний и расширению кругозора",
            PlaceFeature::Shopping => "предлагает широкий выбор товаров и услуг",
            PlaceFeature::Sports => "поддерживает активный образ жизни и физическое развитие",
            PlaceFeature::Children => "создает благоприятную среду для развития и отдыха детей",
            PlaceFeature::Romantic => "обладает особой атмосферой, подходящей для романтических встреч",
            PlaceFeature::Technical => "демонстрирует технологический прогресс и инженерные решения",
            PlaceFeature::Military => "хранит память о военных событиях и подвигах",
            PlaceFeature::Literary => "связан с литературной историей и творчеством",
            PlaceFeature::Musical => "представляет музыкальное искусство в различных формах",
            PlaceFeature::ContemporaryArt => "отражает современные художественные тенденции",
            PlaceFeature::Unique => "обладает уникальными характеристиками и особой ценностью",
            PlaceFeature::Family => "предназначен для комфортного отдыха всей семьей",
        }
    }
}

/// 依名稱與描述中的關鍵字分類，結果不重複且順序固定
pub fn classify(place: &Place) -> Vec<PlaceFeature> {
    let text = format!("{} {}", place.name, place.description).to_lowercase();

    FEATURE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(feature, _)| *feature)
        .collect()
}

/// 為單一停靠點產生推薦理由
pub fn reason(place: &Place, features: &[PlaceFeature], similarity: f64, interests: &str) -> String {
    let interests = interests.to_lowercase();

    let matched = INTEREST_KEYWORDS
        .iter()
        .find(|(key, feature)| interests.contains(key) && features.contains(feature))
        .map(|(_, feature)| *feature);

    if let Some(feature) = matched {
        return feature.matched_reason(&place.name);
    }
    if let Some(feature) = features.first() {
        return feature.general_reason().to_string();
    }

    if similarity >= 0.8 {
        "Имеет высокую релевантность вашему запросу и рекомендуется системой".to_string()
    } else if similarity >= 0.6 {
        "Хорошо соответствует вашим интересам и популярно среди туристов".to_string()
    } else if similarity >= 0.4 {
        "Может быть интересно в рамках вашего маршрута".to_string()
    } else {
        "Дополняет маршрут интересными впечатлениями".to_string()
    }
}
