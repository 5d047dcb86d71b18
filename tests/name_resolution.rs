use chronicle::{
    Entity, EntityType, IndexError, NameIndex, NameResolver, Resolution, ResolutionCache, ResolutionStage,
    ResolverConfig,
};

fn world() -> Vec<Entity> {
    vec![
        Entity::new("Jan Kowalski", EntityType::Character).with_alias("Janek"),
        Entity::new("Anna Nowak", EntityType::Player),
        Entity::new("Targowisko", EntityType::Location),
        Entity::new("Stolica", EntityType::Location).with_alias("Miasto"),
        Entity::new("Kruki", EntityType::Group),
        Entity::new("Złote Monety", EntityType::Item),
        Entity::new("Brama Północna", EntityType::Door),
    ]
}

fn resolve(index: &NameIndex, query: &str, filter: Option<EntityType>) -> Resolution {
    NameResolver::new(index, &ResolverConfig::default()).resolve(query, filter, &mut ResolutionCache::new())
}

#[test]
fn exact_names_and_aliases_resolve_exactly() {
    let index = NameIndex::from_entities(world()).unwrap();
    for entity in world() {
        for name in entity.names() {
            let r = resolve(&index, name, None);
            assert_eq!(r.stage(), Some(ResolutionStage::Exact), "{name}");
            assert_eq!(r.owner(), Some(entity.id), "{name}");
        }
    }
}

#[test]
fn inflected_forms_resolve_by_stem() {
    let index = NameIndex::from_entities(world()).unwrap();
    let r = resolve(&index, "Jan Kowalskiego", None);
    assert_eq!(r.stage(), Some(ResolutionStage::Stem));
    assert_eq!(r.as_match().unwrap().entry.owner_name, "Jan Kowalski");

    let r = resolve(&index, "Krukami", Some(EntityType::Group));
    assert_eq!(r.as_match().unwrap().entry.owner_name, "Kruki");
}

#[test]
fn typos_resolve_fuzzily_within_budget() {
    let index = NameIndex::from_entities(world()).unwrap();
    let r = resolve(&index, "Stolcia", Some(EntityType::Location));
    let m = r.as_match().unwrap();
    assert_eq!(m.stage, ResolutionStage::Fuzzy);
    assert_eq!(m.entry.owner_name, "Stolica");
    assert_eq!(m.distance, Some(2));

    assert!(resolve(&index, "Zupełnie Obcy", None).is_unresolved());
}

#[test]
fn never_guesses_between_owners() {
    let mut entities = world();
    entities.push(Entity::new("Kruk", EntityType::Character));
    let index = NameIndex::from_entities(entities).unwrap();

    for (query, stage) in [("Kruka", ResolutionStage::Stem), ("Krak", ResolutionStage::Fuzzy)] {
        match resolve(&index, query, None) {
            Resolution::Ambiguous { stage: found, candidates } => {
                assert_eq!(found, stage, "{query}");
                let mut names: Vec<&str> = candidates.iter().map(|c| c.owner_name.as_str()).collect();
                names.sort_unstable();
                assert_eq!(names, vec!["Kruk", "Kruki"]);
            }
            other => panic!("expected ambiguity for {query}, got {other:?}"),
        }
    }

    let character = resolve(&index, "Krak", Some(EntityType::Character));
    assert_eq!(character.as_match().unwrap().entry.owner_name, "Kruk");
}

#[test]
fn rebuilt_index_resolves_identically() {
    let first = NameIndex::from_entities(world()).unwrap();
    let second = NameIndex::from_entities(world()).unwrap();
    assert_eq!(first.key_count(), second.key_count());

    let queries = [
        "Janek", "Jankowi", "Targowsko", "Miasta", "kruki", "Złote Monet", "Brama", "Anna", "", "xyz",
    ];
    for query in queries {
        for filter in [None, Some(EntityType::Location), Some(EntityType::Character)] {
            assert_eq!(resolve(&first, query, filter), resolve(&second, query, filter), "{query}");
        }
    }
}

#[test]
fn invalid_entity_sets_are_rejected() {
    assert!(matches!(NameIndex::from_entities(Vec::new()), Err(IndexError::EmptyEntitySet)));
    let blank = vec![Entity::new("  ", EntityType::Location)];
    assert!(matches!(
        NameIndex::from_entities(blank),
        Err(IndexError::BlankCanonicalName { position: 0 })
    ));
    let duplicated = vec![
        Entity::new("Stolica", EntityType::Location),
        Entity::new("stolica", EntityType::Location),
    ];
    assert!(matches!(
        NameIndex::from_entities(duplicated),
        Err(IndexError::DuplicateEntity { .. })
    ));
}

#[test]
fn cache_is_scoped_to_the_session() {
    let index = NameIndex::from_entities(world()).unwrap();
    let resolver = NameResolver::new(&index, &ResolverConfig::default());
    let mut cache = ResolutionCache::new();
    for _ in 0..3 {
        resolver.resolve("Targowsko", Some(EntityType::Location), &mut cache);
    }
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.hits(), 2);
    assert!(ResolutionCache::new().is_empty());
}
