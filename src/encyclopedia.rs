use std::collections::HashMap;

use anyhow::bail;

use crate::i18n::{loc, Localized};

/// A top-level grouping of animals. `animals` keeps display order.
pub struct Category {
    pub id: &'static str,
    pub name: Localized,
    pub description: Localized,
    pub animals: Vec<&'static str>,
}

pub struct Animal {
    pub id: &'static str,
    pub category: &'static str,
    pub name: Localized,
    pub scientific_name: Localized,
    pub conservation_status: Localized,
    pub habitat: Localized,
    pub distribution: Localized,
    pub characteristics: Vec<Localized>,
    pub facts: Vec<Localized>,
}

/// Read-only animal data, built once at startup and shared across handlers.
pub struct Encyclopedia {
    categories: Vec<Category>,
    animals: HashMap<&'static str, Animal>,
}

impl Encyclopedia {
    /// Builds the curated data set and checks referential integrity: every
    /// animal must belong to a known category and every category member must
    /// exist. Requests never re-check this.
    pub fn curated() -> anyhow::Result<Self> {
        Self::build(curated_categories(), curated_animals())
    }

    fn build(categories: Vec<Category>, animal_list: Vec<Animal>) -> anyhow::Result<Self> {
        let mut animals = HashMap::new();
        for animal in animal_list {
            if !categories.iter().any(|c| c.id == animal.category) {
                bail!(
                    "animal {:?} references unknown category {:?}",
                    animal.id,
                    animal.category
                );
            }
            if animals.insert(animal.id, animal).is_some() {
                bail!("duplicate animal id");
            }
        }
        for category in &categories {
            for member in &category.animals {
                if !animals.contains_key(member) {
                    bail!(
                        "category {:?} lists unknown animal {:?}",
                        category.id,
                        member
                    );
                }
            }
        }
        Ok(Self { categories, animals })
    }

    /// All categories, in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Animals of a category in its member order, or `None` for an unknown
    /// category id.
    pub fn animals_in(&self, category_id: &str) -> Option<Vec<&Animal>> {
        let category = self.category(category_id)?;
        Some(
            category
                .animals
                .iter()
                .filter_map(|id| self.animals.get(id))
                .collect(),
        )
    }

    pub fn animal(&self, id: &str) -> Option<&Animal> {
        self.animals.get(id)
    }
}

fn curated_categories() -> Vec<Category> {
    vec![
        Category {
            id: "mammals",
            name: loc("Mammals", "哺乳动物", "포유류"),
            description: loc(
                "Warm-blooded vertebrates that nurse their young.",
                "恒温脊椎动物，以乳汁哺育幼崽。",
                "새끼에게 젖을 먹이는 온혈 척추동물.",
            ),
            animals: vec!["lion", "giant-panda", "african-elephant"],
        },
        Category {
            id: "birds",
            name: loc("Birds", "鸟类", "조류"),
            description: loc(
                "Feathered vertebrates, most of which are capable of flight.",
                "有羽毛的脊椎动物，大多数能够飞行。",
                "깃털을 가진 척추동물로 대부분 비행할 수 있습니다.",
            ),
            animals: vec!["bald-eagle", "emperor-penguin"],
        },
        Category {
            id: "reptiles",
            name: loc("Reptiles", "爬行动物", "파충류"),
            description: loc(
                "Cold-blooded vertebrates with scaly skin.",
                "体表覆盖鳞片的冷血脊椎动物。",
                "비늘 피부를 가진 냉혈 척추동물.",
            ),
            animals: vec!["komodo-dragon", "green-sea-turtle"],
        },
    ]
}

fn curated_animals() -> Vec<Animal> {
    vec![
        Animal {
            id: "lion",
            category: "mammals",
            name: loc("Lion", "狮子", "사자"),
            scientific_name: Localized::invariant("Panthera leo"),
            conservation_status: loc("Vulnerable", "易危", "취약"),
            habitat: loc(
                "Savannas, grasslands, and open woodlands",
                "稀树草原、草原和开阔林地",
                "사바나, 초원, 개활 삼림",
            ),
            distribution: loc(
                "Sub-Saharan Africa; a small population in western India",
                "撒哈拉以南非洲；印度西部有少量种群",
                "사하라 이남 아프리카, 인도 서부의 소규모 개체군",
            ),
            characteristics: vec![
                loc(
                    "The only truly social cat, living in prides",
                    "唯一真正群居的猫科动物，以狮群为单位生活",
                    "무리를 지어 사는 유일한 사회성 고양잇과 동물",
                ),
                loc(
                    "Males carry a distinctive mane",
                    "雄狮拥有标志性的鬃毛",
                    "수컷은 특유의 갈기를 가짐",
                ),
                loc(
                    "Females do most of the hunting, often cooperatively",
                    "雌狮承担大部分捕猎，常常协同作战",
                    "암컷이 대부분의 사냥을 협력하여 수행",
                ),
            ],
            facts: vec![
                loc(
                    "A lion's roar can be heard up to 8 km away.",
                    "狮子的吼声可传至8公里之外。",
                    "사자의 포효는 8km 밖에서도 들립니다.",
                ),
                loc(
                    "Lions rest for up to 20 hours a day.",
                    "狮子每天最多休息20个小时。",
                    "사자는 하루에 최대 20시간을 쉽니다.",
                ),
            ],
        },
        Animal {
            id: "giant-panda",
            category: "mammals",
            name: loc("Giant Panda", "大熊猫", "자이언트판다"),
            scientific_name: Localized::invariant("Ailuropoda melanoleuca"),
            conservation_status: loc("Vulnerable", "易危", "취약"),
            habitat: loc(
                "Temperate mountain bamboo forests",
                "温带高山竹林",
                "온대 산악 대나무 숲",
            ),
            distribution: loc(
                "Mountain ranges of central China",
                "中国中部山区",
                "중국 중부 산악 지대",
            ),
            characteristics: vec![
                loc(
                    "Diet is almost entirely bamboo",
                    "食物几乎全部为竹子",
                    "먹이의 대부분이 대나무",
                ),
                loc(
                    "An enlarged wrist bone works like a thumb",
                    "腕骨特化成伪拇指用于抓握",
                    "늘어난 손목뼈가 엄지처럼 기능",
                ),
                loc(
                    "Distinctive black-and-white coat",
                    "标志性的黑白毛色",
                    "특유의 흑백 털",
                ),
            ],
            facts: vec![
                loc(
                    "A panda eats 12 to 38 kg of bamboo every day.",
                    "大熊猫每天要吃12到38公斤竹子。",
                    "판다는 매일 12~38kg의 대나무를 먹습니다.",
                ),
                loc(
                    "Newborn pandas weigh only about 100 grams.",
                    "新生大熊猫体重仅约100克。",
                    "갓 태어난 판다는 약 100g에 불과합니다.",
                ),
            ],
        },
        Animal {
            id: "african-elephant",
            category: "mammals",
            name: loc("African Elephant", "非洲象", "아프리카코끼리"),
            scientific_name: Localized::invariant("Loxodonta africana"),
            conservation_status: loc("Endangered", "濒危", "멸종 위기"),
            habitat: loc(
                "Savannas, forests, and semi-deserts",
                "稀树草原、森林和半荒漠",
                "사바나, 숲, 반사막",
            ),
            distribution: loc(
                "Sub-Saharan Africa",
                "撒哈拉以南非洲",
                "사하라 이남 아프리카",
            ),
            characteristics: vec![
                loc(
                    "Largest living land animal",
                    "现存最大的陆地动物",
                    "현존하는 가장 큰 육상 동물",
                ),
                loc(
                    "Trunk with two finger-like tips for fine manipulation",
                    "象鼻末端有两个指状突起，可精细操作",
                    "코 끝의 두 돌기로 정교한 조작 가능",
                ),
                loc(
                    "Matriarch-led family herds",
                    "由雌性首领带领的家族群",
                    "암컷 가장이 이끄는 가족 무리",
                ),
            ],
            facts: vec![
                loc(
                    "Elephants can recognize themselves in a mirror.",
                    "大象能在镜子中认出自己。",
                    "코끼리는 거울 속 자신을 알아볼 수 있습니다.",
                ),
                loc(
                    "An adult can drink around 200 liters of water a day.",
                    "成年象一天可饮水约200升。",
                    "성체는 하루 약 200리터의 물을 마십니다.",
                ),
            ],
        },
        Animal {
            id: "bald-eagle",
            category: "birds",
            name: loc("Bald Eagle", "白头海雕", "흰머리수리"),
            scientific_name: Localized::invariant("Haliaeetus leucocephalus"),
            conservation_status: loc("Least Concern", "无危", "관심 대상"),
            habitat: loc(
                "Coasts, lakes, and rivers near large trees",
                "靠近大树的海岸、湖泊与河流",
                "큰 나무가 있는 해안, 호수, 강",
            ),
            distribution: loc(
                "North America",
                "北美洲",
                "북아메리카",
            ),
            characteristics: vec![
                loc(
                    "White head and tail contrast with a dark brown body",
                    "白色头尾与深褐色身体形成对比",
                    "흰 머리와 꼬리가 짙은 갈색 몸과 대비",
                ),
                loc(
                    "Primarily a fish eater, snatching prey from the water",
                    "以鱼类为主食，从水面抓取猎物",
                    "주로 물고기를 수면에서 낚아채 먹음",
                ),
                loc(
                    "Builds the largest nest of any North American bird",
                    "筑巢为北美鸟类中最大",
                    "북미 조류 중 가장 큰 둥지를 지음",
                ),
            ],
            facts: vec![
                loc(
                    "Pairs often reuse and enlarge the same nest for years.",
                    "成对的白头海雕常年复用并扩建同一巢穴。",
                    "한 쌍이 같은 둥지를 수년간 재사용하고 키웁니다.",
                ),
                loc(
                    "Its eyesight is several times sharper than a human's.",
                    "其视力比人类敏锐数倍。",
                    "시력이 사람보다 몇 배나 예리합니다.",
                ),
            ],
        },
        Animal {
            id: "emperor-penguin",
            category: "birds",
            name: loc("Emperor Penguin", "帝企鹅", "황제펭귄"),
            scientific_name: Localized::invariant("Aptenodytes forsteri"),
            conservation_status: loc("Near Threatened", "近危", "준위협"),
            habitat: loc(
                "Antarctic sea ice and surrounding waters",
                "南极海冰及周边海域",
                "남극 해빙과 주변 해역",
            ),
            distribution: loc("Antarctica", "南极洲", "남극 대륙"),
            characteristics: vec![
                loc(
                    "Tallest and heaviest living penguin",
                    "现存体型最高最重的企鹅",
                    "현존 펭귄 중 가장 크고 무거움",
                ),
                loc(
                    "Breeds in the Antarctic winter; males incubate the egg",
                    "在南极冬季繁殖，由雄性孵蛋",
                    "남극의 겨울에 번식하며 수컷이 알을 품음",
                ),
                loc(
                    "Huddles in dense groups to conserve heat",
                    "密集抱团取暖",
                    "빽빽하게 모여 체온을 유지",
                ),
            ],
            facts: vec![
                loc(
                    "Dives can exceed 500 meters in depth.",
                    "下潜深度可超过500米。",
                    "잠수 깊이가 500m를 넘을 수 있습니다.",
                ),
                loc(
                    "Males fast for about two months while incubating.",
                    "雄性孵蛋期间约禁食两个月。",
                    "수컷은 알을 품는 약 두 달간 금식합니다.",
                ),
            ],
        },
        Animal {
            id: "komodo-dragon",
            category: "reptiles",
            name: loc("Komodo Dragon", "科莫多巨蜥", "코모도왕도마뱀"),
            scientific_name: Localized::invariant("Varanus komodoensis"),
            conservation_status: loc("Endangered", "濒危", "멸종 위기"),
            habitat: loc(
                "Tropical savanna and forest on volcanic islands",
                "火山岛上的热带稀树草原和森林",
                "화산섬의 열대 사바나와 숲",
            ),
            distribution: loc(
                "A handful of Indonesian islands, including Komodo",
                "包括科莫多岛在内的少数印尼岛屿",
                "코모도섬 등 인도네시아의 몇몇 섬",
            ),
            characteristics: vec![
                loc(
                    "Largest living lizard, up to 3 meters long",
                    "现存最大的蜥蜴，体长可达3米",
                    "현존 최대 도마뱀으로 길이 3m에 달함",
                ),
                loc(
                    "Venomous bite aids in subduing large prey",
                    "毒性咬伤有助于制服大型猎物",
                    "독이 있는 입으로 큰 먹잇감을 제압",
                ),
                loc(
                    "Keen sense of smell via a forked tongue",
                    "借助分叉的舌头拥有敏锐嗅觉",
                    "갈라진 혀로 뛰어난 후각을 발휘",
                ),
            ],
            facts: vec![
                loc(
                    "It can smell carrion from several kilometers away.",
                    "能嗅到数公里外的腐肉。",
                    "수 킬로미터 밖의 사체 냄새를 맡을 수 있습니다.",
                ),
                loc(
                    "Females can reproduce without a mate by parthenogenesis.",
                    "雌性可通过孤雌生殖繁衍后代。",
                    "암컷은 단성 생식으로 번식할 수 있습니다.",
                ),
            ],
        },
        Animal {
            id: "green-sea-turtle",
            category: "reptiles",
            name: loc("Green Sea Turtle", "绿海龟", "푸른바다거북"),
            scientific_name: Localized::invariant("Chelonia mydas"),
            conservation_status: loc("Endangered", "濒危", "멸종 위기"),
            habitat: loc(
                "Tropical and subtropical coastal waters",
                "热带和亚热带沿海水域",
                "열대 및 아열대 연안 해역",
            ),
            distribution: loc(
                "Worldwide in warm oceans",
                "全球温暖海域",
                "전 세계의 따뜻한 바다",
            ),
            characteristics: vec![
                loc(
                    "Adults graze mainly on seagrass and algae",
                    "成体主要以海草和藻类为食",
                    "성체는 주로 해초와 조류를 먹음",
                ),
                loc(
                    "Named for the green fat beneath its shell",
                    "因壳下脂肪呈绿色而得名",
                    "등딱지 아래 녹색 지방에서 이름이 유래",
                ),
                loc(
                    "Returns to its natal beach to nest",
                    "会回到出生的海滩产卵",
                    "태어난 해변으로 돌아와 산란",
                ),
            ],
            facts: vec![
                loc(
                    "It can hold its breath for hours while resting.",
                    "休息时可闭气数小时。",
                    "휴식 중에는 몇 시간 동안 숨을 참을 수 있습니다.",
                ),
                loc(
                    "Hatchlings navigate to the sea by moonlight.",
                    "幼龟借月光爬向大海。",
                    "새끼는 달빛을 따라 바다로 향합니다.",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Lang;

    #[test]
    fn curated_data_is_referentially_consistent() {
        let enc = Encyclopedia::curated().unwrap();
        for category in enc.categories() {
            let animals = enc.animals_in(category.id).unwrap();
            assert_eq!(animals.len(), category.animals.len());
        }
        // every animal's category resolves
        for category in enc.categories() {
            for animal in enc.animals_in(category.id).unwrap() {
                assert!(enc.category(animal.category).is_some());
            }
        }
    }

    #[test]
    fn unknown_ids_return_none() {
        let enc = Encyclopedia::curated().unwrap();
        assert!(enc.category("doesnotexist").is_none());
        assert!(enc.animals_in("doesnotexist").is_none());
        assert!(enc.animal("doesnotexist").is_none());
    }

    #[test]
    fn lookups_respect_member_order() {
        let enc = Encyclopedia::curated().unwrap();
        let mammals = enc.animals_in("mammals").unwrap();
        assert_eq!(mammals[0].id, "lion");
        assert_eq!(mammals[0].name.get(Lang::Zh), "狮子");
    }

    #[test]
    fn build_rejects_dangling_category_reference() {
        let animals = vec![Animal {
            id: "ghost",
            category: "nope",
            name: loc("Ghost", "鬼", "유령"),
            scientific_name: Localized::invariant("Phantasma"),
            conservation_status: loc("Unknown", "未知", "불명"),
            habitat: loc("", "", ""),
            distribution: loc("", "", ""),
            characteristics: vec![],
            facts: vec![],
        }];
        assert!(Encyclopedia::build(curated_categories(), animals).is_err());
    }
}
