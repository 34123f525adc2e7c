//! Stop-word list (English and Turkish).

use once_cell::sync::Lazy;
use std::collections::HashSet;

const ENGLISH: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "way", "who", "did", "put", "say", "she", "too", "use", "this", "that", "with",
    "have", "from", "they", "know", "want", "been", "good", "much", "some", "time", "very", "when",
    "come", "here", "just", "like", "long", "make", "many", "over", "such", "take", "than", "them",
    "well", "were", "will", "your", "said", "each", "which", "their", "would", "there", "could",
    "other", "after", "first", "never", "these", "think", "where", "being", "every", "great",
    "might", "shall", "still", "those", "under", "while", "again", "before", "through", "another",
    "because", "between", "should", "without", "around", "became", "during", "little", "please",
    "seemed", "turned", "wanted", "better", "enough", "instead", "nothing", "something",
    "sometimes", "together", "almost", "already", "although", "anything", "different",
    "everything", "following", "probably", "what", "into", "also", "then", "only", "about",
    "more", "most", "does", "doing", "done", "any", "why", "off", "own", "same", "both", "few",
    "once", "upon", "via", "yet", "ever", "even", "per",
];

const TURKISH: &[&str] = &[
    "bir", "bu", "şu", "ve", "ile", "için", "da", "de", "den", "dan", "ya", "ye", "nin", "nın",
    "nun", "nün", "lar", "ler", "ben", "sen", "biz", "siz", "onlar", "benim", "senin", "bizim",
    "sizin", "onların", "beni", "seni", "bizi", "sizi", "onları", "bana", "sana", "bize", "size",
    "onlara", "bende", "sende", "bizde", "sizde", "onlarda", "benden", "senden", "bizden",
    "sizden", "onlardan", "benimle", "seninle", "bizimle", "sizinle", "onlarla", "var", "yok",
    "olmak", "etmek", "yapmak", "gelmek", "gitmek", "almak", "vermek", "görmek", "bilmek",
    "istemek", "çok", "az", "iyi", "kötü", "yeni", "eski", "önce", "sonra", "şimdi", "dün",
    "bugün", "yarın", "geçen", "gelecek", "hiç", "bazen", "hep", "hiçbir", "bazı", "tüm",
    "hepsi", "kimse", "herkes", "biri", "bazısı", "çoğu", "azı", "tamamı", "yarısı", "ama",
    "fakat", "gibi", "kadar", "daha", "en", "mi", "mı", "mu", "mü", "ki", "ne", "olan", "olarak",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH.iter().chain(TURKISH.iter()).copied().collect());

/// True if `word` (already lower-cased) is a stop-word.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}
